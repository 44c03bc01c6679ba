//! Outgoing message bodies: rich embeds, message content, and replies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Colour used by failure embeds.
pub const FAILURE_COLOR: u32 = 0x00c9_2a2a;

/// Default colour of embeds sent on behalf of moderators.
pub const DEFAULT_COLOR: u32 = 0x0007_2c59;

/// Largest colour value an embed accepts.
const MAX_COLOR: u32 = 0x00ff_ffff;

/// Error returned when a colour is not a six-digit hexadecimal value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{0}' is an invalid color")]
pub struct InvalidColorError(pub String);

/// Parses a hexadecimal colour such as `072c59` or `#072C59`.
///
/// # Errors
///
/// Returns [`InvalidColorError`] when the input is not a hexadecimal value
/// within the 24-bit colour range.
pub fn parse_color(raw: &str) -> Result<u32, InvalidColorError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    u32::from_str_radix(digits, 16)
        .ok()
        .filter(|value| *value <= MAX_COLOR)
        .ok_or_else(|| InvalidColorError(raw.to_owned()))
}

/// Author block shown at the top of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    /// Author name.
    pub name: String,
    /// Optional author link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Optional author icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Name/value field inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    #[serde(default)]
    pub inline: bool,
}

/// Rich embed attached to a message.
///
/// Every part is optional; builders only set what is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Title line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link attached to the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Side-bar colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Large image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Small corner image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Author block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    /// Ordered fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    /// Footer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Embed {
    /// Creates an empty embed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the title link.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the side-bar colour.
    #[must_use]
    pub const fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the large image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the author block.
    #[must_use]
    pub fn with_author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            url: None,
            icon_url,
        });
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    /// Sets the footer text.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Builds the embed shown to a user whose invocation failed.
    ///
    /// `arguments` echoes back the non-empty inputs so the user can retry
    /// without retyping them.
    #[must_use]
    pub fn failure<'a>(
        title: impl Into<String>,
        message: impl Into<String>,
        arguments: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut embed = Self::new()
            .with_title(title)
            .with_description(message)
            .with_color(FAILURE_COLOR);
        for (name, value) in arguments {
            if !value.trim().is_empty() {
                embed = embed.with_field(name, value);
            }
        }
        embed
    }
}

/// Content of a message the bot sends or edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Plain text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Attached embeds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl MessageContent {
    /// Creates a plain text message.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    /// Creates a message holding a single embed.
    #[must_use]
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }

    /// Returns whether the message carries neither text nor embeds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.embeds.is_empty()
    }
}

/// Response to an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Response body.
    pub body: MessageContent,
    /// Whether only the invoking user can see the response.
    #[serde(default)]
    pub ephemeral: bool,
}

impl Reply {
    /// Creates a public text reply.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            body: MessageContent::text(content),
            ephemeral: false,
        }
    }

    /// Creates a public embed reply.
    #[must_use]
    pub fn embed(embed: Embed) -> Self {
        Self {
            body: MessageContent::embed(embed),
            ephemeral: false,
        }
    }

    /// Marks the reply as visible to the invoking user only.
    #[must_use]
    pub const fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}
