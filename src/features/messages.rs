//! Moderator commands that send and edit messages on the bot's behalf.
//!
//! Both commands take the same text and embed options and refuse
//! combinations the host would render badly. Refusals are returned as
//! [`InvocationError::Rejected`], which the dispatcher shows privately along
//! with the options the moderator supplied.

use crate::capability::domain::{
    Capability, CapabilityDraft, CapabilityKind, ChannelId, CommandArguments, CommandDraft,
    MessageId, ParameterSpec, ParameterType,
};
use crate::capability::ports::{ChatHostError, command_fn};
use crate::interaction::{
    BotContext, DEFAULT_COLOR, Embed, InvocationContext, InvocationError, InvocationResult,
    MessageContent, parse_color,
};

/// Text and embed options shared by `send` and `edit`.
///
/// Blank options count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedInput {
    /// Plain text content.
    pub content: Option<String>,
    /// Embed title.
    pub title: Option<String>,
    /// Embed description.
    pub description: Option<String>,
    /// Embed colour as typed.
    pub color: Option<String>,
    /// Link attached to the embed title.
    pub url: Option<String>,
    /// Embed image link.
    pub image: Option<String>,
}

impl EmbedInput {
    /// Reads the options from command arguments.
    #[must_use]
    pub fn from_arguments(arguments: &CommandArguments) -> Self {
        Self {
            content: filled(arguments, "content"),
            title: filled(arguments, "title"),
            description: filled(arguments, "description"),
            color: filled(arguments, "color"),
            url: link(arguments, "url"),
            image: link(arguments, "image"),
        }
    }

    /// Returns whether no option was given.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.url.is_none()
            && self.image.is_none()
    }

    /// Returns whether both title and description were given.
    #[must_use]
    pub const fn has_full_embed(&self) -> bool {
        self.title.is_some() && self.description.is_some()
    }

    /// Returns whether exactly one of title and description was given.
    #[must_use]
    pub const fn has_partial_embed(&self) -> bool {
        self.title.is_some() != self.description.is_some()
    }

    /// Parses the colour option.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Rejected`] naming the invalid colour.
    pub fn parsed_color(&self) -> InvocationResult<Option<u32>> {
        self.color
            .as_deref()
            .map(parse_color)
            .transpose()
            .map_err(|err| InvocationError::rejected(format!("{err}.")))
    }

    /// Builds a new embed from the options.
    #[must_use]
    pub fn to_embed(&self, color: Option<u32>) -> Embed {
        let mut embed = Embed::new();
        embed.title.clone_from(&self.title);
        embed.description.clone_from(&self.description);
        embed.url.clone_from(&self.url);
        embed.image.clone_from(&self.image);
        embed.color = color;
        embed
    }

    /// Applies the given options over an existing embed.
    #[must_use]
    pub fn merge_into(&self, mut embed: Embed, color: Option<u32>) -> Embed {
        if self.title.is_some() {
            embed.title.clone_from(&self.title);
        }
        if self.description.is_some() {
            embed.description.clone_from(&self.description);
        }
        if color.is_some() {
            embed.color = color;
        }
        if self.url.is_some() {
            embed.url.clone_from(&self.url);
        }
        if self.image.is_some() {
            embed.image.clone_from(&self.image);
        }
        embed
    }
}

fn filled(arguments: &CommandArguments, name: &str) -> Option<String> {
    arguments
        .string(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Link options accept `none` to leave the link unset.
fn link(arguments: &CommandArguments, name: &str) -> Option<String> {
    filled(arguments, name).filter(|value| !value.eq_ignore_ascii_case("none"))
}

fn embed_parameters() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::optional(
            "content",
            "The content of the message.",
            ParameterType::String,
        ),
        ParameterSpec::optional("title", "Title of the embed.", ParameterType::String),
        ParameterSpec::optional(
            "description",
            "Description of the embed.",
            ParameterType::String,
        ),
        ParameterSpec::optional(
            "color",
            "The hexcode to use for the embed's color.",
            ParameterType::String,
        ),
        ParameterSpec::optional(
            "url",
            "The URL the embed should link to.",
            ParameterType::String,
        ),
        ParameterSpec::optional(
            "image",
            "URL to an image that the embed should use.",
            ParameterType::String,
        ),
    ]
}

fn target_channel(arguments: &CommandArguments) -> InvocationResult<ChannelId> {
    arguments
        .channel("channel")
        .ok_or_else(|| InvocationError::MissingArgument {
            parameter: "channel".to_owned(),
        })
}

/// Sends a message, optionally with an embed, to a channel.
#[derive(Debug, Clone, Copy)]
pub struct MessageSend;

impl Capability for MessageSend {
    const IDENTIFIER: &'static str = "message_send";
    const DOCUMENTATION: &'static str = "Send a message through the bot.";
    const KIND: CapabilityKind = CapabilityKind::Command;

    fn build(context: &BotContext) -> CapabilityDraft {
        let mut draft = CommandDraft::new()
            .named("send")
            .restricted_to(context.config().roles.moderator)
            .parameter(ParameterSpec::required(
                "channel",
                "The channel to send the message to.",
                ParameterType::Channel,
            ));
        for parameter in embed_parameters() {
            draft = draft.parameter(parameter);
        }
        CapabilityDraft::Command(draft.action(command_fn(send)))
    }
}

async fn send(context: InvocationContext, arguments: CommandArguments) -> InvocationResult<()> {
    let channel = target_channel(&arguments)?;
    let input = EmbedInput::from_arguments(&arguments);

    if input.content.is_none() && !input.has_full_embed() {
        return Err(InvocationError::rejected(
            "You must provide either `content` or `title` AND `description`.",
        ));
    }
    let color = input.parsed_color()?.unwrap_or(DEFAULT_COLOR);
    if input.has_partial_embed() {
        return Err(InvocationError::rejected(
            "Failed to send embed since either `title` or `description` was missing.",
        ));
    }

    let message = MessageContent {
        content: input.content.clone(),
        embeds: if input.has_full_embed() {
            vec![input.to_embed(Some(color))]
        } else {
            Vec::new()
        },
    };
    context.host().send_message(channel, &message).await?;
    context.reply_private("Success!").await
}

/// Edits a message the bot sent earlier.
///
/// Options left blank keep their current value. The first embed of the
/// message is updated in place; a message without an embed gains one when
/// both title and description are given.
#[derive(Debug, Clone, Copy)]
pub struct MessageEdit;

impl Capability for MessageEdit {
    const IDENTIFIER: &'static str = "message_edit";
    const DOCUMENTATION: &'static str = "Edit a message previously sent through the bot.";
    const KIND: CapabilityKind = CapabilityKind::Command;

    fn build(context: &BotContext) -> CapabilityDraft {
        let mut draft = CommandDraft::new()
            .named("edit")
            .restricted_to(context.config().roles.moderator)
            .parameter(ParameterSpec::required(
                "channel",
                "The channel holding the message.",
                ParameterType::Channel,
            ))
            .parameter(ParameterSpec::required(
                "message",
                "The identifier of the message to edit.",
                ParameterType::Integer,
            ));
        for parameter in embed_parameters() {
            draft = draft.parameter(parameter);
        }
        CapabilityDraft::Command(draft.action(command_fn(edit)))
    }
}

async fn edit(context: InvocationContext, arguments: CommandArguments) -> InvocationResult<()> {
    let channel = target_channel(&arguments)?;
    let message_id = arguments
        .integer("message")
        .and_then(|raw| u64::try_from(raw).ok())
        .map(MessageId::new)
        .ok_or_else(|| InvocationError::InvalidArgument {
            parameter: "message".to_owned(),
            reason: "expected a message identifier".to_owned(),
        })?;

    let host = context.host();
    let original = match host.fetch_message(channel, message_id).await {
        Ok(found) => found,
        Err(ChatHostError::NotFound(_)) => {
            return Err(InvocationError::rejected("That message could not be found."));
        }
        Err(other) => return Err(other.into()),
    };
    if original.author != host.current_user() {
        return Err(InvocationError::rejected(
            "Please provide a message sent by the bot.",
        ));
    }

    let input = EmbedInput::from_arguments(&arguments);
    if input.is_empty() {
        return Err(InvocationError::rejected("Please input something."));
    }
    let color = input.parsed_color()?;
    let has_embed = !original.embeds.is_empty();
    if !has_embed && input.has_partial_embed() {
        return Err(InvocationError::rejected(
            "Failed to add an embed due to missing `title` or `description`.",
        ));
    }
    if !has_embed
        && !input.has_full_embed()
        && (color.is_some() || input.url.is_some() || input.image.is_some())
    {
        return Err(InvocationError::rejected(
            "Can't change color or set URLs without title and description.",
        ));
    }

    let embed = match original.embeds.first() {
        Some(existing) => Some(input.merge_into(existing.clone(), color)),
        None if input.has_full_embed() => Some(input.to_embed(color)),
        None => None,
    };
    let content = input
        .content
        .clone()
        .or_else(|| Some(original.content.clone()).filter(|text| !text.is_empty()));
    let edited = MessageContent {
        content,
        embeds: embed.into_iter().collect(),
    };
    host.edit_message(channel, message_id, &edited).await?;
    context.reply_private("Success!").await
}
