use std::collections::HashMap;

use tracing::debug;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const SLOT_PREFIX: &str = "slot:";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(String),
}

/// An HTML template with named insertion points written as
/// `<!-- slot:NAME -->` (whitespace after `<!--` is optional). Slot contents start empty and every fill replaces
/// the previous content.
#[derive(Clone, Debug)]
pub struct HostPage {
    segments: Vec<Segment>,
    contents: HashMap<String, String>,
}

/// Handle to one slot. A detached slot stands in for a marker the template
/// does not have and ignores whatever is written to it.
#[derive(Debug)]
pub enum Slot<'a> {
    Mounted(&'a mut String),
    Detached(String),
}

impl Slot<'_> {
    pub fn is_mounted(&self) -> bool {
        matches!(self, Slot::Mounted(_))
    }

    pub fn replace(self, html: impl Into<String>) {
        match self {
            Slot::Mounted(content) => *content = html.into(),
            Slot::Detached(name) => debug!("no slot '{}' in host page, skipping", name),
        }
    }
}

impl HostPage {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut contents = HashMap::new();
        let mut text = String::new();
        let mut rest = template;

        while let Some(start) = rest.find(COMMENT_OPEN) {
            let body_start = start + COMMENT_OPEN.len();
            let Some(len) = rest[body_start..].find(COMMENT_CLOSE) else {
                break;
            };
            let consumed = body_start + len + COMMENT_CLOSE.len();
            let name = rest[body_start..body_start + len]
                .trim_start()
                .strip_prefix(SLOT_PREFIX)
                .map(str::trim)
                .filter(|name| !name.is_empty());

            match name {
                Some(name) => {
                    text.push_str(&rest[..start]);
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Slot(name.to_string()));
                    contents.entry(name.to_string()).or_insert_with(String::new);
                }
                // plain comment, kept verbatim
                None => text.push_str(&rest[..consumed]),
            }
            rest = &rest[consumed..];
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Self { segments, contents }
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.contents.contains_key(name)
    }

    pub fn slot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for seg in &self.segments {
            if let Segment::Slot(name) = seg {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn slot(&mut self, name: &str) -> Slot<'_> {
        match self.contents.get_mut(name) {
            Some(content) => Slot::Mounted(content),
            None => Slot::Detached(name.to_string()),
        }
    }

    /// Shorthand for `slot(name).replace(html)`. Returns whether the slot
    /// exists.
    pub fn fill(&mut self, name: &str, html: impl Into<String>) -> bool {
        let slot = self.slot(name);
        let mounted = slot.is_mounted();
        slot.replace(html);
        mounted
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(name) => {
                    if let Some(content) = self.contents.get(name) {
                        out.push_str(content);
                    }
                }
            }
        }
        out
    }
}
