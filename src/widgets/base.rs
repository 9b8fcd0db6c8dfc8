#[derive(Debug, Clone)]
pub struct InputBase {
    id: String,
    label: String,
}

impl InputBase {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn focus_marker(&self, focused: bool) -> &'static str {
        if focused { ">" } else { " " }
    }

    /// `"> Label: "` padded so that values line up across fields.
    pub fn prefixed_label(&self, focused: bool, label_width: usize) -> String {
        format!(
            "{} {:<width$} ",
            self.focus_marker(focused),
            format!("{}:", self.label),
            width = label_width + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::InputBase;

    #[test]
    fn labels_are_padded_to_common_width() {
        let base = InputBase::new("state", "State");
        assert_eq!(base.prefixed_label(true, 6), "> State:  ");
        assert_eq!(base.prefixed_label(false, 5), "  State: ");
    }
}
