//! Block-structured prompt builder.
//!
//! [`PromptBuilder`] assembles a preamble followed by `HEADING:` blocks,
//! joined with blank lines. Empty blocks are skipped so optional sections
//! never leave a dangling heading behind.

/// Builder for multi-block prompts.
///
/// # Example
///
/// ```
/// use coach_rs::prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new("You are a coach.")
///     .section("USER PROFILE", "- Name: Sam")
///     .section_if(false, "PREVIOUS FEEDBACK", || "unused".into())
///     .section("NOTES", "")
///     .build();
///
/// assert_eq!(prompt, "You are a coach.\n\nUSER PROFILE:\n- Name: Sam");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    blocks: Vec<String>,
}

impl PromptBuilder {
    /// Create a builder whose first block is `preamble`, included as-is.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self::default().raw(preamble)
    }

    /// Append a `HEADING:` block. Skipped if `content` is empty.
    pub fn section(mut self, heading: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.blocks.push(format!("{heading}:\n{content}"));
        }
        self
    }

    /// Conditionally append a block. `content_fn` only runs when
    /// `condition` is true.
    pub fn section_if(
        self,
        condition: bool,
        heading: &str,
        content_fn: impl FnOnce() -> String,
    ) -> Self {
        if condition {
            self.section(heading, content_fn())
        } else {
            self
        }
    }

    /// Append raw text without a heading. Skipped if empty.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.blocks.push(content);
        }
        self
    }

    /// Join all blocks with blank lines.
    pub fn build(self) -> String {
        self.blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_only() {
        assert_eq!(PromptBuilder::new("Coach.").build(), "Coach.");
    }

    #[test]
    fn sections_are_separated_by_blank_lines() {
        let prompt = PromptBuilder::new("Coach.")
            .section("A", "one")
            .section("B", "two")
            .build();
        assert_eq!(prompt, "Coach.\n\nA:\none\n\nB:\ntwo");
    }

    #[test]
    fn conditional_section_included_when_true() {
        let prompt = PromptBuilder::new("Coach.")
            .section_if(true, "EXTRA", || "yes".into())
            .build();
        assert!(prompt.ends_with("EXTRA:\nyes"));
    }

    #[test]
    fn empty_raw_is_skipped() {
        let prompt = PromptBuilder::new("").raw("body").build();
        assert_eq!(prompt, "body");
    }
}
