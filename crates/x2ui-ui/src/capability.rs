//! Named client-side actions reachable from `javascript:` handler targets.
//!
//! Targets are never evaluated. The text after the marker must be a call to a registered name,
//! `name` or `name(arg, 'arg', "arg")`; anything else fails as a script error.

use ahash::AHashMap;
use std::sync::Arc;

use x2ui_core::{UiError, UiResult};

use crate::client::{Client, ClientEffect};

pub type Capability = Arc<dyn Fn(&mut Client, &[String]) -> UiResult<()> + Send + Sync>;

/// Parsed local action reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCall {
    pub name: String,
    pub args: Vec<String>,
}

impl ScriptCall {
    pub fn parse(text: &str) -> UiResult<Self> {
        let src = text.trim().trim_end_matches(';').trim();
        let invalid = || UiError::script(format!("invalid local action '{src}'"), format!("at {src}"));

        let (name, rest) = match src.find('(') {
            Some(i) => (&src[..i], Some(&src[i + 1..])),
            None => (src, None),
        };
        let name = name.trim();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
        {
            return Err(invalid());
        }

        let args = match rest {
            None => Vec::new(),
            Some(rest) => {
                let inner = rest.strip_suffix(')').ok_or_else(invalid)?;
                split_args(inner).ok_or_else(invalid)?
            }
        };

        Ok(Self {
            name: name.to_owned(),
            args,
        })
    }

    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }
}

impl std::fmt::Display for ScriptCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            return write!(f, "{}", self.name);
        }
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

fn split_args(inner: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut quote: Option<char> = None;
    let mut quoted = false;

    for ch in inner.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => cur.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    quoted = true;
                }
                ',' => {
                    out.push(std::mem::take(&mut cur).trim().to_owned());
                    quoted = false;
                }
                '(' | ')' | ';' | '{' | '}' | '=' => return None,
                c => cur.push(c),
            },
        }
    }
    if quote.is_some() {
        return None;
    }
    let last = cur.trim().to_owned();
    if !last.is_empty() || quoted || !out.is_empty() {
        out.push(last);
    }
    Some(out)
}

/// Capability table.
#[derive(Clone, Default)]
pub struct LocalActions {
    table: AHashMap<String, Capability>,
}

impl LocalActions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table preloaded with the interpreter's own actions.
    pub fn builtin() -> Self {
        let mut t = Self::new();
        t.register("modal.dismiss", |c, _| {
            c.dismiss_modal();
            Ok(())
        });
        t.register("modal.close", |c, args| {
            c.close_dialog(required(args, 0, "modal.close")?);
            Ok(())
        });
        t.register("notifications.clear", |c, _| {
            c.clear_notifications();
            Ok(())
        });
        t.register("datalist.save", |c, args| {
            c.datalist_save(required(args, 0, "datalist.save")?)
        });
        t.register("datalist.cancel", |c, args| {
            c.close_dialog(required(args, 0, "datalist.cancel")?);
            Ok(())
        });
        t.register("datalist.remove", |c, args| {
            c.datalist_remove(
                required(args, 0, "datalist.remove")?,
                required(args, 1, "datalist.remove")?,
            )
        });
        t.register("navigate", |c, args| {
            c.push_effect(ClientEffect::Navigate(required(args, 0, "navigate")?.to_owned()));
            Ok(())
        });
        t.register("download", |c, args| {
            c.push_effect(ClientEffect::Download(required(args, 0, "download")?.to_owned()));
            Ok(())
        });
        t
    }

    pub fn register<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&mut Client, &[String]) -> UiResult<()> + Send + Sync + 'static,
    {
        if self.table.insert(name.to_owned(), Arc::new(f)).is_some() {
            log::debug!("capability '{name}' replaced");
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<Capability> {
        self.table.get(name).cloned()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.table.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}

fn required<'a>(args: &'a [String], i: usize, name: &str) -> UiResult<&'a str> {
    args.get(i)
        .map(String::as_str)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| UiError::script(format!("{name}: missing argument {}", i + 1), format!("at {name}")))
}
