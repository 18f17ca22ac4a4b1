//! Slack Block Kit message model.
//!
//! Announcements are a fixed three-part layout: a headline section with an
//! image accessory, a divider, and a footer stat line. Every render builds
//! a fresh block structure; nothing here is shared or mutated in place.

use serde::Serialize;

/// A single Block Kit block.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Section {
        text: Text,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<ImageAccessory>,
    },
    Divider,
}

impl Block {
    /// A plain mrkdwn section.
    pub fn section(text: impl Into<String>) -> Self {
        Self::Section {
            text: Text::mrkdwn(text),
            accessory: None,
        }
    }

    /// A mrkdwn section with an image accessory.
    pub fn section_with_image(
        text: impl Into<String>,
        image_url: impl Into<String>,
        alt_text: impl Into<String>,
    ) -> Self {
        Self::Section {
            text: Text::mrkdwn(text),
            accessory: Some(ImageAccessory::new(image_url, alt_text)),
        }
    }
}

/// A mrkdwn text object.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Text {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl Text {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: "mrkdwn",
            text: text.into(),
        }
    }
}

/// An image accessory attached to a section.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageAccessory {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub image_url: String,
    pub alt_text: String,
}

impl ImageAccessory {
    pub fn new(image_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            kind: "image",
            image_url: image_url.into(),
            alt_text: alt_text.into(),
        }
    }
}

/// Content of one rendered announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveMessage {
    /// Headline mrkdwn text
    pub headline: String,

    /// Accessory image URL
    pub image_url: String,

    /// Accessory image alt text
    pub alt_text: String,

    /// Footer stat line mrkdwn text
    pub footer: String,
}

impl SolveMessage {
    /// Render the three-part block layout for the Slack API.
    pub fn to_blocks(&self) -> Vec<Block> {
        vec![
            Block::section_with_image(&self.headline, &self.image_url, &self.alt_text),
            Block::Divider,
            Block::section(&self.footer),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> SolveMessage {
        SolveMessage {
            headline: "solved it".to_string(),
            image_url: "https://example.com/img.jpg".to_string(),
            alt_text: "Challenge solved!".to_string(),
            footer: "now ranked *3rd*".to_string(),
        }
    }

    #[test]
    fn renders_three_part_layout() {
        let blocks = sample_message().to_blocks();
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], Block::Divider));
    }

    #[test]
    fn serializes_block_kit_shapes() {
        let json = serde_json::to_value(sample_message().to_blocks()).unwrap();
        assert_eq!(json[0]["type"], "section");
        assert_eq!(json[0]["text"]["type"], "mrkdwn");
        assert_eq!(json[0]["accessory"]["type"], "image");
        assert_eq!(json[0]["accessory"]["alt_text"], "Challenge solved!");
        assert_eq!(json[1]["type"], "divider");
        assert_eq!(json[2]["type"], "section");
        assert!(json[2].get("accessory").is_none());
    }

    #[test]
    fn each_render_is_a_fresh_structure() {
        let message = sample_message();
        let first = message.to_blocks();
        let second = message.to_blocks();
        assert_eq!(first, second);
    }
}
