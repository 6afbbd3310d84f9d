#![forbid(unsafe_op_in_unsafe_fn)]

//! View-description interpreter.
//!
//! Renders server-described JSON views into an element [`Document`], binds interactions to
//! backend actions or local capabilities, and applies the responses: full-page panels, modal
//! dialogs or in-place partial updates. Tables page and sort through per-table state records.

mod binder;
mod capability;
mod client;
mod dispatch;
mod dom;
mod notify;
mod render;
mod session;
mod table;

pub use binder::{UiEvent, VIEW_FIELD};
pub use capability::{Capability, LocalActions, ScriptCall};
pub use client::{
    Client, ClientEffect, Settings, Shell, APPLICATION_MENU, FEATURE_BODY, FEATURE_TITLE,
    SIDE_MENU,
};
pub use dispatch::{Region, RequestFailure, USER_HEADER};
pub use dom::{Document, Element, ElementId, FileAttachment};
pub use notify::{FORM_GROUP_PREFIX, NOTIFICATION_AREA};
pub use render::datalist::NEW_ITEM_KEY;
pub use render::{ExtensionRenderer, RenderFn, Rendered, RendererTable, TimerTask};
pub use session::{UiSession, UserIdentity};
pub use table::{PageControl, SortDirection, TableId, TableState};
