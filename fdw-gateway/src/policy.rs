use {
    log::{debug, error},
    serde::{
        de::{self, Deserializer, Unexpected, Visitor},
        ser::Serializer,
        Deserialize, Serialize,
    },
    std::{
        fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
        str::{from_utf8, FromStr},
    },
};

pub const POLICY_VERSION: &str = "2012-10-17";

const EFFECT_ALLOW_DENY_MSG: &str = "\"Allow\" or \"Deny\"";
const EFFECT_ALLOW_DENY_ELEMENTS: &[&str; 2] = &["Allow", "Deny"];

/// An IAM policy document. Only the subset this service generates is
/// modeled: a list of statements, each with an effect, one action, and one
/// resource.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub statement: Vec<Statement>,
}

impl Policy {
    /// The single-statement allow policy this service uploads.
    pub fn allow(action: Action, resource: Resource) -> Self {
        Self {
            version: Some(POLICY_VERSION.to_string()),
            id: None,
            statement: vec![Statement {
                sid: None,
                effect: Effect::Allow,
                action,
                resource,
            }],
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let buf = Vec::new();
        let serde_formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(buf, serde_formatter);
        if let Err(e) = self.serialize(&mut ser) {
            error!("Failed to serialize policy: {:?}", e);
            return Err(FmtError);
        }

        match from_utf8(&ser.into_inner()) {
            Ok(s) => write!(f, "{}", s),
            Err(e) => {
                error!("JSON serialization of policy contained non-UTF-8 characters: {:?}", e);
                Err(FmtError)
            }
        }
    }
}

impl FromStr for Policy {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match serde_json::from_str::<Self>(s) {
            Ok(policy) => Ok(policy),
            Err(e) => {
                debug!("Failed to parse policy: {}: {:?}", s, e);
                Err(e)
            }
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct Statement {
    #[serde(rename = "Sid", skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    #[serde(rename = "Effect")]
    pub effect: Effect,

    #[serde(rename = "Action")]
    pub action: Action,

    #[serde(rename = "Resource")]
    pub resource: Resource,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    Allow,
    Deny,
}

struct EffectVisitor {}
impl Visitor<'_> for EffectVisitor {
    type Value = Effect;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", EFFECT_ALLOW_DENY_MSG)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match v {
            "Allow" => Ok(Effect::Allow),
            "Deny" => Ok(Effect::Deny),
            _ => Err(E::unknown_variant(v, EFFECT_ALLOW_DENY_ELEMENTS)),
        }
    }
}

impl<'de> Deserialize<'de> for Effect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(EffectVisitor {})
    }
}

impl Serialize for Effect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        })
    }
}

#[derive(Debug, PartialEq)]
pub enum Action {
    Any,
    Specific { service: String, action: String },
}

impl Action {
    pub fn specific<S1, S2>(service: S1, action: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::Specific {
            service: service.into(),
            action: action.into(),
        }
    }
}

struct ActionVisitor {}
impl Visitor<'_> for ActionVisitor {
    type Value = Action;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "service:action or \"*\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v == "*" {
            return Ok(Action::Any);
        }

        let Some((service, action)) = v.split_once(':') else {
            return Err(E::invalid_value(Unexpected::Str(v), &self));
        };

        if !is_valid_action_part(service, false) {
            debug!("Action {} has an invalid service: {:#?}", v, service);
            return Err(E::invalid_value(Unexpected::Str(v), &self));
        }

        if !is_valid_action_part(action, true) {
            debug!("Action {} has an invalid action: {:#?}", v, action);
            return Err(E::invalid_value(Unexpected::Str(v), &self));
        }

        Ok(Action::Specific {
            service: service.into(),
            action: action.into(),
        })
    }
}

fn is_valid_action_part(part: &str, allow_wildcard: bool) -> bool {
    if part.is_empty() || !part.is_ascii() {
        return false;
    }

    for (i, c) in part.bytes().enumerate() {
        let interior = i > 0 && i < part.len() - 1;
        if !c.is_ascii_alphanumeric()
            && !(allow_wildcard && c == b'*')
            && !(interior && (c == b'-' || c == b'_'))
        {
            return false;
        }
    }

    true
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ActionVisitor {})
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Any => serializer.serialize_str("*"),
            Self::Specific { service, action } => {
                serializer.serialize_str(&format!("{}:{}", service, action))
            }
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Resource {
    Any,
    Arn(String),
}

struct ResourceVisitor {}
impl Visitor<'_> for ResourceVisitor {
    type Value = Resource;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "resource ARN or \"*\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v == "*" {
            Ok(Resource::Any)
        } else {
            Ok(Resource::Arn(v.into()))
        }
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ResourceVisitor {})
    }
}

impl Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Any => serializer.serialize_str("*"),
            Self::Arn(arn) => serializer.serialize_str(arn),
        }
    }
}

#[cfg(test)]
mod unittest;
