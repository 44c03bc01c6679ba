//! Command, group, and context-action specifications.

use super::{CapabilityDescriptor, ChannelId, CommandName, ConfigurationError, RoleId, UserId};
use crate::capability::ports::{CommandAction, ContextAction};
use crate::interaction::{InvocationError, InvocationResult};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Declared type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// Free-form string value.
    String,
    /// Integer value.
    Integer,
    /// Boolean value (`true` or `false`).
    Boolean,
    /// Server member, as an identifier or mention.
    User,
    /// Text channel, as an identifier or mention.
    Channel,
    /// One of a fixed set of strings.
    Choice,
}

/// Parameter specification of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name.
    pub name: String,
    /// Help text shown by the host.
    pub description: String,
    /// Parameter type.
    pub parameter_type: ParameterType,
    /// Whether the parameter is required.
    pub required: bool,
    /// Allowed values for `choice` parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl ParameterSpec {
    /// Creates a parameter specification.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameter_type: ParameterType,
        required: bool,
    ) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            description: description.into(),
            parameter_type,
            required,
            choices: Vec::new(),
        }
    }

    /// Creates a required parameter.
    #[must_use]
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        parameter_type: ParameterType,
    ) -> Self {
        Self::new(name, description, parameter_type, true)
    }

    /// Creates an optional parameter.
    #[must_use]
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        parameter_type: ParameterType,
    ) -> Self {
        Self::new(name, description, parameter_type, false)
    }

    /// Adds allowed values for `choice` parameters.
    #[must_use]
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }
}

/// Typed arguments of one command invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArguments {
    values: BTreeMap<String, Value>,
}

impl CommandArguments {
    /// Returns the raw typed value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// Returns a string or choice argument.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns an integer argument.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Returns a boolean argument.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Returns a user argument.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<UserId> {
        self.get(name).and_then(Value::as_u64).map(UserId::new)
    }

    /// Returns a channel argument.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<ChannelId> {
        self.get(name).and_then(Value::as_u64).map(ChannelId::new)
    }

    /// Returns the supplied arguments rendered as text, for echoing back in
    /// failure replies.
    #[must_use]
    pub fn echo(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| {
                let rendered = value
                    .as_str()
                    .map_or_else(|| value.to_string(), str::to_owned);
                (name.clone(), rendered)
            })
            .collect()
    }
}

/// Validated slash command.
#[derive(Clone)]
pub struct CommandSpec {
    implementation: String,
    name: CommandName,
    description: String,
    owner_group: Option<CommandName>,
    parameters: Vec<ParameterSpec>,
    required_role: Option<RoleId>,
    action: Arc<dyn CommandAction>,
}

impl CommandSpec {
    /// Creates a command specification.
    #[must_use]
    pub fn new(
        implementation: impl Into<String>,
        descriptor: CapabilityDescriptor,
        action: Arc<dyn CommandAction>,
    ) -> Self {
        let (name, description) = descriptor.into_parts();
        Self {
            implementation: implementation.into(),
            name,
            description,
            owner_group: None,
            parameters: Vec::new(),
            required_role: None,
            action,
        }
    }

    /// Sets the declared parameters after validating their definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidParameter`] for duplicate or
    /// malformed parameters.
    pub fn with_parameters(
        mut self,
        parameters: Vec<ParameterSpec>,
    ) -> Result<Self, ConfigurationError> {
        validate_parameter_definitions(&self.implementation, &parameters)?;
        self.parameters = parameters;
        Ok(self)
    }

    /// Restricts the command to members holding `role`.
    #[must_use]
    pub const fn with_required_role(mut self, role: Option<RoleId>) -> Self {
        self.required_role = role;
        self
    }

    /// Marks the command as a subcommand of `group`.
    #[must_use]
    pub fn owned_by(mut self, group: CommandName) -> Self {
        self.owner_group = Some(group);
        self
    }

    /// Returns the implementation identifier.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the command description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the owning group's name, if the command is a subcommand.
    #[must_use]
    pub const fn owner_group(&self) -> Option<&CommandName> {
        self.owner_group.as_ref()
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Returns the role required to invoke the command.
    #[must_use]
    pub const fn required_role(&self) -> Option<RoleId> {
        self.required_role
    }

    /// Returns the bound action.
    #[must_use]
    pub fn action(&self) -> Arc<dyn CommandAction> {
        Arc::clone(&self.action)
    }

    /// Validates and converts raw invocation arguments.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] when arguments are missing, unknown, or
    /// invalid for the declared parameters.
    pub fn parse_arguments(
        &self,
        provided: &BTreeMap<String, String>,
    ) -> InvocationResult<CommandArguments> {
        for key in provided.keys() {
            if !self
                .parameters
                .iter()
                .any(|parameter| parameter.name == *key)
            {
                return Err(InvocationError::UnknownArgument {
                    parameter: key.clone(),
                });
            }
        }

        let mut values = BTreeMap::new();
        for parameter in &self.parameters {
            match provided.get(&parameter.name) {
                Some(raw) => {
                    values.insert(parameter.name.clone(), parse_argument(parameter, raw)?);
                }
                None if parameter.required => {
                    return Err(InvocationError::MissingArgument {
                        parameter: parameter.name.clone(),
                    });
                }
                None => {
                    values.insert(parameter.name.clone(), Value::Null);
                }
            }
        }

        Ok(CommandArguments { values })
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandSpec")
            .field("implementation", &self.implementation)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("owner_group", &self.owner_group)
            .field("parameters", &self.parameters)
            .field("required_role", &self.required_role)
            .finish_non_exhaustive()
    }
}

/// Validated group of subcommands. Groups nest one level only.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    implementation: String,
    name: CommandName,
    description: String,
    commands: Vec<CommandSpec>,
}

impl GroupSpec {
    /// Creates a group; each command is marked as owned by the group.
    #[must_use]
    pub fn new(
        implementation: impl Into<String>,
        descriptor: CapabilityDescriptor,
        commands: Vec<CommandSpec>,
    ) -> Self {
        let (name, description) = descriptor.into_parts();
        let owned = commands
            .into_iter()
            .map(|command| command.owned_by(name.clone()))
            .collect();
        Self {
            implementation: implementation.into(),
            name,
            description,
            commands: owned,
        }
    }

    /// Returns the implementation identifier.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns the group name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the group description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the ordered subcommands.
    #[must_use]
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Finds a subcommand by name.
    #[must_use]
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands
            .iter()
            .find(|command| command.name().as_str() == name)
    }
}

/// Kind of entity a context action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextTargetKind {
    /// Right-click on a message.
    Message,
    /// Right-click on a user.
    User,
}

impl ContextTargetKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::User => "user",
        }
    }
}

impl fmt::Display for ContextTargetKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated context action.
#[derive(Clone)]
pub struct ContextActionSpec {
    implementation: String,
    name: CommandName,
    target: ContextTargetKind,
    action: Arc<dyn ContextAction>,
}

impl ContextActionSpec {
    /// Creates a context-action specification.
    #[must_use]
    pub fn new(
        implementation: impl Into<String>,
        name: CommandName,
        target: ContextTargetKind,
        action: Arc<dyn ContextAction>,
    ) -> Self {
        Self {
            implementation: implementation.into(),
            name,
            target,
            action,
        }
    }

    /// Returns the implementation identifier.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Returns the action name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the kind of entity the action applies to.
    #[must_use]
    pub const fn target(&self) -> ContextTargetKind {
        self.target
    }

    /// Returns the bound action.
    #[must_use]
    pub fn action(&self) -> Arc<dyn ContextAction> {
        Arc::clone(&self.action)
    }
}

impl fmt::Debug for ContextActionSpec {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ContextActionSpec")
            .field("implementation", &self.implementation)
            .field("name", &self.name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

fn validate_parameter_definitions(
    implementation: &str,
    parameters: &[ParameterSpec],
) -> Result<(), ConfigurationError> {
    let invalid = |parameter: &ParameterSpec, reason: &str| ConfigurationError::InvalidParameter {
        implementation: implementation.to_owned(),
        parameter: parameter.name.clone(),
        reason: reason.to_owned(),
    };

    let mut names = HashSet::new();
    let mut seen_optional = false;
    for parameter in parameters {
        if CommandName::new(implementation, parameter.name.as_str()).is_err() {
            return Err(invalid(parameter, "parameter names follow command name rules"));
        }
        if !names.insert(parameter.name.as_str()) {
            return Err(invalid(parameter, "duplicate parameter definition"));
        }
        if parameter.description.trim().is_empty() {
            return Err(invalid(parameter, "parameters must be described"));
        }
        if matches!(parameter.parameter_type, ParameterType::Choice) && parameter.choices.is_empty()
        {
            return Err(invalid(parameter, "choice parameters must provide choices"));
        }
        if parameter.required && seen_optional {
            return Err(invalid(
                parameter,
                "required parameters must precede optional ones",
            ));
        }
        seen_optional |= !parameter.required;
    }
    Ok(())
}

fn parse_argument(parameter: &ParameterSpec, raw: &str) -> InvocationResult<Value> {
    let invalid = |reason: &str| InvocationError::InvalidArgument {
        parameter: parameter.name.clone(),
        reason: reason.to_owned(),
    };

    match parameter.parameter_type {
        ParameterType::String => Ok(Value::String(raw.to_owned())),
        ParameterType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(|value| Value::Number(Number::from(value)))
            .map_err(|_| invalid("expected an integer")),
        ParameterType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid("expected true or false")),
        },
        ParameterType::User => parse_snowflake(raw, &["<@!", "<@"])
            .map(|value| Value::Number(Number::from(value)))
            .ok_or_else(|| invalid("expected a user")),
        ParameterType::Channel => parse_snowflake(raw, &["<#"])
            .map(|value| Value::Number(Number::from(value)))
            .ok_or_else(|| invalid("expected a channel")),
        ParameterType::Choice => {
            if parameter.choices.iter().any(|choice| choice == raw) {
                Ok(Value::String(raw.to_owned()))
            } else {
                Err(invalid(&format!(
                    "expected one of [{}]",
                    parameter.choices.join(", ")
                )))
            }
        }
    }
}

fn parse_snowflake(raw: &str, mention_prefixes: &[&str]) -> Option<u64> {
    let trimmed = raw.trim();
    let digits = mention_prefixes
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix)?.strip_suffix('>'))
        .unwrap_or(trimmed);
    digits.parse().ok()
}
