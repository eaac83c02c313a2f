//! Message chain exchanged with the host.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// One part of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Plain { text: String },
    Image { file: String },
    Record {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    At { target: String },
    Reply { id: String },
}

impl Component {
    /// Audio record pointing at a local file.
    pub fn record(path: &Path) -> Self {
        let file = path.to_string_lossy().into_owned();
        Component::Record {
            url: Some(file.clone()),
            file,
        }
    }

    /// Text carried by this component, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Component::Plain { text } => Some(text),
            _ => None,
        }
    }
}

/// Ordered components of one outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain {
    pub components: Vec<Component>,
}

impl MessageChain {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// Chain with a single plain text component.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Component::Plain { text: text.into() }])
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Concatenation of all text-bearing components, or `None` when there
    /// are none.
    pub fn text(&self) -> Option<String> {
        let mut parts = self.components.iter().filter_map(Component::text).peekable();
        parts.peek()?;
        Some(parts.collect())
    }

    /// Replaces every component with `component`.
    pub fn replace(&mut self, component: Component) {
        self.components = vec![component];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_concatenation() {
        let chain = MessageChain::new(vec![
            Component::Plain { text: "  Hello, ".into() },
            Component::Image { file: "a.png".into() },
            Component::Plain { text: "world  ".into() },
        ]);
        assert_eq!(chain.text().as_deref(), Some("  Hello, world  "));
    }

    #[test]
    fn test_no_text() {
        assert_eq!(MessageChain::default().text(), None);
        let chain = MessageChain::new(vec![Component::Image { file: "a.png".into() }]);
        assert_eq!(chain.text(), None);
    }

    #[test]
    fn test_json_shape() {
        let chain: MessageChain =
            serde_json::from_str(r#"[{"type":"plain","text":"hi"},{"type":"at","target":"42"}]"#).unwrap();
        assert_eq!(chain.components.len(), 2);

        let record = Component::record(Path::new("/data/tts.wav"));
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["type"], "record");
        assert_eq!(v["file"], "/data/tts.wav");
        assert_eq!(v["url"], "/data/tts.wav");
    }
}
