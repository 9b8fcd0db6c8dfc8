use crate::api::ApiRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(ApiRequest),
    RequestRender,
    Exit,
}
