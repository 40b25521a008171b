//! # Messages
//!
//! The string-based channel UI elements use to talk to modules. A click on a
//! cancel button, a key binding, or another module all produce a line such as:
//!
//! ```text
//! notification:Tiles updated#3                free text, 3 s timeout
//! ml:notification:m:Route found;2.5           structured notify
//! ml:notification:workInProgressOverlay:enable
//! ms:notification:cancelTask:tiles-1a2b3c4d
//! ```
//!
//! `ml` carries a `;`-separated argument list, `ms` a single argument string.
//! Without a kind prefix everything after `<module>:` is the message name,
//! colons included.
//!
//! [`Directive::classify`] turns a parsed message into what the notification
//! hub should do. Dispatch order matters: the structured `m` form first, then
//! the overlay toggle, then task cancellation, and free text last.

use log::{error, warn};
use std::fmt;
use std::time::Duration;

use crate::core::banner::MAX_TIMEOUT;

/// Module name the notification hub answers to.
pub const NOTIFICATION_MODULE: &str = "notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// `ml`: argument list separated by `;`.
    List,
    /// `ms`: one argument string.
    Single,
}

impl MessageKind {
    fn prefix(self) -> &'static str {
        match self {
            MessageKind::List => "ml",
            MessageKind::Single => "ms",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "ml" => Some(MessageKind::List),
            "ms" => Some(MessageKind::Single),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: Option<MessageKind>,
    pub module: String,
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// No `<module>:` prefix, or an empty module/name.
    Malformed(String),
    /// A timeout field that is not a non-negative number of seconds.
    BadTimeout(String),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::Malformed(raw) => write!(f, "malformed message: {raw:?}"),
            MessageError::BadTimeout(raw) => write!(f, "invalid timeout: {raw:?}"),
        }
    }
}

impl std::error::Error for MessageError {}

impl Message {
    pub fn parse(raw: &str) -> Result<Self, MessageError> {
        let malformed = || MessageError::Malformed(raw.to_string());

        let first = raw.split(':').next().unwrap_or("");
        if let Some(kind) = MessageKind::from_prefix(first) {
            let mut fields = raw.splitn(4, ':').skip(1);
            let module = fields.next().filter(|m| !m.is_empty()).ok_or_else(malformed)?;
            let name = fields.next().filter(|n| !n.is_empty()).ok_or_else(malformed)?;
            let args = match (kind, fields.next()) {
                (_, None) | (_, Some("")) => Vec::new(),
                (MessageKind::List, Some(rest)) => rest.split(';').map(str::to_string).collect(),
                (MessageKind::Single, Some(rest)) => vec![rest.to_string()],
            };
            return Ok(Self {
                kind: Some(kind),
                module: module.to_string(),
                name: name.to_string(),
                args,
            });
        }

        let (module, name) = raw.split_once(':').ok_or_else(malformed)?;
        if module.is_empty() || name.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            kind: None,
            module: module.to_string(),
            name: name.to_string(),
            args: Vec::new(),
        })
    }

    /// The message a task's cancel button emits.
    pub fn cancel_task(task_name: &str) -> Self {
        Self {
            kind: Some(MessageKind::Single),
            module: NOTIFICATION_MODULE.to_string(),
            name: "cancelTask".to_string(),
            args: vec![task_name.to_string()],
        }
    }

    pub fn is_for(&self, module: &str) -> bool {
        self.module == module
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => {
                write!(f, "{}:{}:{}", kind.prefix(), self.module, self.name)?;
                if !self.args.is_empty() {
                    write!(f, ":{}", self.args.join(";"))?;
                }
                Ok(())
            }
            None => write!(f, "{}:{}", self.module, self.name),
        }
    }
}

/// What a notification message asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Show `text`; `None` timeout means the configured default.
    Notify {
        text: String,
        timeout: Option<Duration>,
    },
    WipOverlay(bool),
    CancelTask(String),
}

impl Directive {
    /// Decide what `message` means. Returns `None` (after logging) for
    /// directives that are missing their arguments.
    pub fn classify(message: &Message) -> Option<Self> {
        let args = &message.args;
        match (message.kind, message.name.as_str()) {
            (Some(MessageKind::List), "m") => {
                let Some(text) = args.first() else {
                    warn!("Notify message without text: {message}");
                    return None;
                };
                let timeout = args.get(1).and_then(|raw| timeout_or_default(raw));
                Some(Directive::Notify {
                    text: text.clone(),
                    timeout,
                })
            }
            (Some(MessageKind::List), "workInProgressOverlay") => {
                match args.first().map(String::as_str) {
                    Some("enable") => Some(Directive::WipOverlay(true)),
                    Some("disable") => Some(Directive::WipOverlay(false)),
                    other => {
                        warn!("Unknown work-in-progress overlay argument: {other:?}");
                        None
                    }
                }
            }
            (Some(_), "cancelTask") => match args.first() {
                Some(task) if !task.is_empty() => Some(Directive::CancelTask(task.clone())),
                _ => {
                    warn!("cancelTask message without a task name");
                    None
                }
            },
            _ => Some(free_text(&message.name)),
        }
    }
}

/// `text#seconds` free-form notification.
fn free_text(payload: &str) -> Directive {
    let parts: Vec<&str> = payload.split('#').collect();
    let timeout = match parts.as_slice() {
        [_, raw] => timeout_or_default(raw),
        [_] => None,
        _ => {
            warn!("Too many '#' fields in {payload:?}, using default timeout");
            None
        }
    };
    Directive::Notify {
        text: parts[0].to_string(),
        timeout,
    }
}

fn timeout_or_default(raw: &str) -> Option<Duration> {
    match parse_timeout_secs(raw) {
        Ok(timeout) => Some(timeout),
        Err(e) => {
            error!("{e}, using default timeout");
            None
        }
    }
}

/// Parse a timeout given in (possibly fractional) seconds. Anything longer
/// than [`MAX_TIMEOUT`] is rejected.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, MessageError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|timeout| *timeout <= MAX_TIMEOUT)
        .ok_or_else(|| MessageError::BadTimeout(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(raw: &str) -> Option<Directive> {
        Directive::classify(&Message::parse(raw).unwrap())
    }

    #[test]
    fn test_parse_plain() {
        let m = Message::parse("notification:Time: 5pm#3").unwrap();
        assert_eq!(m.kind, None);
        assert_eq!(m.module, "notification");
        assert_eq!(m.name, "Time: 5pm#3");
        assert!(m.args.is_empty());
    }

    #[test]
    fn test_parse_list() {
        let m = Message::parse("ml:notification:m:Hello world!;5").unwrap();
        assert_eq!(m.kind, Some(MessageKind::List));
        assert_eq!(m.name, "m");
        assert_eq!(m.args, vec!["Hello world!", "5"]);
    }

    #[test]
    fn test_parse_single_keeps_separators() {
        let m = Message::parse("ms:notification:cancelTask:job;with:colons").unwrap();
        assert_eq!(m.kind, Some(MessageKind::Single));
        assert_eq!(m.args, vec!["job;with:colons"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(Message::parse("nocolon"), Err(MessageError::Malformed(_))));
        assert!(matches!(Message::parse(":name"), Err(MessageError::Malformed(_))));
        assert!(matches!(Message::parse("ml:notification"), Err(MessageError::Malformed(_))));
    }

    #[test]
    fn test_cancel_task_message_text() {
        let m = Message::cancel_task("tiles-42");
        assert_eq!(m.to_string(), "ms:notification:cancelTask:tiles-42");
        assert_eq!(Message::parse(&m.to_string()).unwrap(), m);
    }

    #[test]
    fn test_structured_notify() {
        assert_eq!(
            classify("ml:notification:m:Hello world!;2.5"),
            Some(Directive::Notify {
                text: "Hello world!".into(),
                timeout: Some(Duration::from_millis(2500)),
            })
        );
        assert_eq!(
            classify("ml:notification:m:No timeout"),
            Some(Directive::Notify {
                text: "No timeout".into(),
                timeout: None,
            })
        );
        assert_eq!(classify("ml:notification:m"), None);
    }

    #[test]
    fn test_structured_notify_bad_timeout_uses_default() {
        assert_eq!(
            classify("ml:notification:m:Hi;soon"),
            Some(Directive::Notify {
                text: "Hi".into(),
                timeout: None,
            })
        );
    }

    #[test]
    fn test_wip_overlay_toggle() {
        assert_eq!(
            classify("ml:notification:workInProgressOverlay:enable"),
            Some(Directive::WipOverlay(true))
        );
        assert_eq!(
            classify("ml:notification:workInProgressOverlay:disable"),
            Some(Directive::WipOverlay(false))
        );
        assert_eq!(classify("ml:notification:workInProgressOverlay:maybe"), None);
    }

    #[test]
    fn test_cancel_task_directive() {
        assert_eq!(
            classify("ms:notification:cancelTask:search-1"),
            Some(Directive::CancelTask("search-1".into()))
        );
        assert_eq!(
            classify("ml:notification:cancelTask:search-2"),
            Some(Directive::CancelTask("search-2".into()))
        );
        assert_eq!(classify("ms:notification:cancelTask"), None);
    }

    #[test]
    fn test_free_text_with_timeout() {
        assert_eq!(
            classify("notification:Tiles updated#3"),
            Some(Directive::Notify {
                text: "Tiles updated".into(),
                timeout: Some(Duration::from_secs(3)),
            })
        );
    }

    #[test]
    fn test_free_text_malformed_timeout_falls_back() {
        assert_eq!(
            classify("notification:Hi#abc"),
            Some(Directive::Notify {
                text: "Hi".into(),
                timeout: None,
            })
        );
    }

    #[test]
    fn test_free_text_without_timeout() {
        assert_eq!(
            classify("notification:Just text"),
            Some(Directive::Notify {
                text: "Just text".into(),
                timeout: None,
            })
        );
        assert_eq!(
            classify("notification:a#1#2"),
            Some(Directive::Notify {
                text: "a".into(),
                timeout: None,
            })
        );
    }

    #[test]
    fn test_kindless_cancel_is_free_text() {
        // Without a kind prefix "cancelTask" is just text.
        assert!(matches!(
            classify("notification:cancelTask"),
            Some(Directive::Notify { .. })
        ));
    }

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs(" 4 "), Ok(Duration::from_secs(4)));
        assert_eq!(parse_timeout_secs("0.25"), Ok(Duration::from_millis(250)));
        assert!(parse_timeout_secs("-1").is_err());
        assert!(parse_timeout_secs("inf").is_err());
        assert!(parse_timeout_secs("abc").is_err());
    }

    #[test]
    fn test_oversized_timeouts_are_rejected() {
        assert_eq!(parse_timeout_secs("86400"), Ok(MAX_TIMEOUT));
        assert!(parse_timeout_secs("86400.5").is_err());
        assert!(parse_timeout_secs("1e30").is_err());
        assert!(parse_timeout_secs("1.5e19").is_err());
        assert_eq!(
            classify("notification:Hi#1e30"),
            Some(Directive::Notify {
                text: "Hi".into(),
                timeout: None,
            })
        );
    }
}
