//! Container image references.
//!
//! Parses `[registry/]repository[:tag][@digest]` and derives the pull policy
//! the orchestrator applies when a container does not set one.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::deployment::PullPolicy;

const MAX_TAG_LEN: usize = 128;
const MIN_DIGEST_HEX_LEN: usize = 32;
const LATEST_TAG: &str = "latest";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image reference is empty")]
    Empty,

    #[error("image reference contains whitespace")]
    Whitespace,

    #[error("invalid registry '{0}'")]
    Registry(String),

    #[error("invalid repository '{0}'")]
    Repository(String),

    #[error("invalid tag '{0}'")]
    Tag(String),

    #[error("invalid digest '{0}'")]
    Digest(String),
}

/// A parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: Option<String>,
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageReference {
    /// Registry host (with optional port), when one is given.
    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Registry and repository without tag or digest.
    pub fn name(&self) -> String {
        match &self.registry {
            Some(registry) => format!("{registry}/{}", self.repository),
            None => self.repository.clone(),
        }
    }

    /// True when the reference floats: no digest and either no tag or `latest`.
    pub fn is_floating(&self) -> bool {
        self.digest.is_none()
            && self
                .tag
                .as_deref()
                .map_or(true, |tag| tag == LATEST_TAG)
    }

    /// Pull policy Kubernetes assumes when `imagePullPolicy` is omitted.
    pub fn default_pull_policy(&self) -> PullPolicy {
        if self.is_floating() {
            PullPolicy::Always
        } else {
            PullPolicy::IfNotPresent
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

fn looks_like_registry(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

fn check_registry(registry: &str) -> Result<(), ImageError> {
    let (host, port) = match registry.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (registry, None),
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let port_ok = port.map_or(true, |p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if host_ok && port_ok {
        Ok(())
    } else {
        Err(ImageError::Registry(registry.to_string()))
    }
}

fn check_repository(repository: &str) -> Result<(), ImageError> {
    let component_ok = |component: &str| {
        let edges_ok = component
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            && component
                .chars()
                .last()
                .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        edges_ok
            && component.chars().all(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
            })
    };
    if repository.split('/').all(component_ok) {
        Ok(())
    } else {
        Err(ImageError::Repository(repository.to_string()))
    }
}

fn check_tag(tag: &str) -> Result<(), ImageError> {
    let first_ok = tag
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    let rest_ok = tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if first_ok && rest_ok && tag.len() <= MAX_TAG_LEN {
        Ok(())
    } else {
        Err(ImageError::Tag(tag.to_string()))
    }
}

fn check_digest(digest: &str) -> Result<(), ImageError> {
    let valid = digest.split_once(':').is_some_and(|(algorithm, hex)| {
        !algorithm.is_empty()
            && algorithm
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '.' | '_' | '-'))
            && hex.len() >= MIN_DIGEST_HEX_LEN
            && hex.chars().all(|c| c.is_ascii_hexdigit())
    });
    if valid {
        Ok(())
    } else {
        Err(ImageError::Digest(digest.to_string()))
    }
}

impl FromStr for ImageReference {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ImageError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(ImageError::Whitespace);
        }

        let (rest, digest) = match s.split_once('@') {
            Some((rest, digest)) => (rest, Some(digest.to_string())),
            None => (s, None),
        };
        if let Some(digest) = &digest {
            check_digest(digest)?;
        }

        // A ':' after the last '/' separates the tag; earlier ones belong to a registry port.
        let last_slash = rest.rfind('/').map_or(0, |i| i + 1);
        let (name, tag) = match rest[last_slash..].rfind(':') {
            Some(i) => {
                let split = last_slash + i;
                (&rest[..split], Some(rest[split + 1..].to_string()))
            }
            None => (rest, None),
        };
        if let Some(tag) = &tag {
            check_tag(tag)?;
        }

        let (registry, repository) = match name.split_once('/') {
            Some((first, remainder)) if looks_like_registry(first) => {
                check_registry(first)?;
                (Some(first.to_string()), remainder)
            }
            _ => (None, name),
        };
        check_repository(repository)?;

        Ok(Self {
            registry,
            repository: repository.to_string(),
            tag,
            digest,
        })
    }
}
