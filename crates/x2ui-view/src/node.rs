use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::handler::{HandlerDescriptor, ServerEvent};
use crate::props::{
    AreaFormProps, AreaProps, BooleanProps, ButtonDef, CheckboxGroupProps, CodeProps,
    ContainerProps, DataListProps, DialogProps, EmbeddedWebProps, FormProps, FormSectionProps,
    HtmlProps, ImageProps, InputButtonProps, LabelProps, MultiselectProps, PanelProps,
    PicklistProps, TabProps, TextProps, TopMenuProps, UserMenuProps, ValueProps, WindowProps,
};
use crate::table::TableConfig;

/// Known view discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTag {
    Window,
    Table,
    Button,
    Form,
    Picklist,
    Text,
    Code,
    Row,
    FormSection,
    Area,
    Label,
    MultiselectPicklist,
    InputButton,
    Data,
    Number,
    Boolean,
    DataList,
    Tab,
    Binary,
    ReadOnly,
    ColorPicker,
    Html,
    CheckboxGroup,
    Date,
    Time,
    DateTime,
    TopMenu,
    EmbeddedWeb,
    UserMenu,
    Image,
    AreaForm,
    Panel,
    Dialog,
}

impl ViewTag {
    pub const ALL: [ViewTag; 33] = [
        ViewTag::Window,
        ViewTag::Table,
        ViewTag::Button,
        ViewTag::Form,
        ViewTag::Picklist,
        ViewTag::Text,
        ViewTag::Code,
        ViewTag::Row,
        ViewTag::FormSection,
        ViewTag::Area,
        ViewTag::Label,
        ViewTag::MultiselectPicklist,
        ViewTag::InputButton,
        ViewTag::Data,
        ViewTag::Number,
        ViewTag::Boolean,
        ViewTag::DataList,
        ViewTag::Tab,
        ViewTag::Binary,
        ViewTag::ReadOnly,
        ViewTag::ColorPicker,
        ViewTag::Html,
        ViewTag::CheckboxGroup,
        ViewTag::Date,
        ViewTag::Time,
        ViewTag::DateTime,
        ViewTag::TopMenu,
        ViewTag::EmbeddedWeb,
        ViewTag::UserMenu,
        ViewTag::Image,
        ViewTag::AreaForm,
        ViewTag::Panel,
        ViewTag::Dialog,
    ];

    /// Wire discriminator (`class` field).
    pub fn class_name(self) -> &'static str {
        match self {
            ViewTag::Window => "WindowView",
            ViewTag::Table => "TableView",
            ViewTag::Button => "ButtonView",
            ViewTag::Form => "FormView",
            ViewTag::Picklist => "PicklistView",
            ViewTag::Text => "TextView",
            ViewTag::Code => "CodeView",
            ViewTag::Row => "RowView",
            ViewTag::FormSection => "FormSectionView",
            ViewTag::Area => "AreaView",
            ViewTag::Label => "LabelView",
            ViewTag::MultiselectPicklist => "MultiselectPicklistView",
            ViewTag::InputButton => "InputButtonView",
            ViewTag::Data => "DataView",
            ViewTag::Number => "NumberView",
            ViewTag::Boolean => "BooleanView",
            ViewTag::DataList => "DataListView",
            ViewTag::Tab => "TabView",
            ViewTag::Binary => "BinaryView",
            ViewTag::ReadOnly => "ReadOnlyView",
            ViewTag::ColorPicker => "ColorPickerView",
            ViewTag::Html => "HTMLView",
            ViewTag::CheckboxGroup => "CheckboxGroupView",
            ViewTag::Date => "DateView",
            ViewTag::Time => "TimeView",
            ViewTag::DateTime => "DateTimeView",
            ViewTag::TopMenu => "TopMenu",
            ViewTag::EmbeddedWeb => "EmbeddedWebView",
            ViewTag::UserMenu => "UserMenu",
            ViewTag::Image => "ImageView",
            ViewTag::AreaForm => "AreaFormView",
            ViewTag::Panel => "PanelView",
            ViewTag::Dialog => "DialogView",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.class_name() == class)
    }
}

/// Attributes shared by every node regardless of class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMeta {
    /// Raw discriminator; empty when the node had none.
    pub class: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub attributes: Map<String, Value>,
    /// `(interaction name, handler)` in declaration order.
    pub handlers: SmallVec<[(String, HandlerDescriptor); 2]>,
    pub info_message: Option<String>,
    pub warn_message: Option<String>,
    pub events: Vec<ServerEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewKind {
    Window(WindowProps),
    Table(TableConfig),
    Button(ButtonDef),
    Form(FormProps),
    Picklist(PicklistProps),
    Text(TextProps),
    Code(CodeProps),
    Row(ContainerProps),
    FormSection(FormSectionProps),
    Area(AreaProps),
    Label(LabelProps),
    MultiselectPicklist(MultiselectProps),
    InputButton(InputButtonProps),
    Data(ValueProps),
    Number(ValueProps),
    Boolean(BooleanProps),
    DataList(DataListProps),
    Tab(TabProps),
    Binary,
    ReadOnly(ValueProps),
    ColorPicker(ValueProps),
    Html(HtmlProps),
    CheckboxGroup(CheckboxGroupProps),
    Date(ValueProps),
    Time(ValueProps),
    DateTime(ValueProps),
    TopMenu(TopMenuProps),
    EmbeddedWeb(EmbeddedWebProps),
    UserMenu(UserMenuProps),
    Image(ImageProps),
    AreaForm(AreaFormProps),
    Panel(PanelProps),
    Dialog(DialogProps),

    /// Discriminator outside the known set.
    Unknown,
    /// Known discriminator whose attributes could not be read.
    Invalid { tag: ViewTag, reason: String },
}

impl ViewKind {
    pub fn tag(&self) -> Option<ViewTag> {
        Some(match self {
            ViewKind::Window(_) => ViewTag::Window,
            ViewKind::Table(_) => ViewTag::Table,
            ViewKind::Button(_) => ViewTag::Button,
            ViewKind::Form(_) => ViewTag::Form,
            ViewKind::Picklist(_) => ViewTag::Picklist,
            ViewKind::Text(_) => ViewTag::Text,
            ViewKind::Code(_) => ViewTag::Code,
            ViewKind::Row(_) => ViewTag::Row,
            ViewKind::FormSection(_) => ViewTag::FormSection,
            ViewKind::Area(_) => ViewTag::Area,
            ViewKind::Label(_) => ViewTag::Label,
            ViewKind::MultiselectPicklist(_) => ViewTag::MultiselectPicklist,
            ViewKind::InputButton(_) => ViewTag::InputButton,
            ViewKind::Data(_) => ViewTag::Data,
            ViewKind::Number(_) => ViewTag::Number,
            ViewKind::Boolean(_) => ViewTag::Boolean,
            ViewKind::DataList(_) => ViewTag::DataList,
            ViewKind::Tab(_) => ViewTag::Tab,
            ViewKind::Binary => ViewTag::Binary,
            ViewKind::ReadOnly(_) => ViewTag::ReadOnly,
            ViewKind::ColorPicker(_) => ViewTag::ColorPicker,
            ViewKind::Html(_) => ViewTag::Html,
            ViewKind::CheckboxGroup(_) => ViewTag::CheckboxGroup,
            ViewKind::Date(_) => ViewTag::Date,
            ViewKind::Time(_) => ViewTag::Time,
            ViewKind::DateTime(_) => ViewTag::DateTime,
            ViewKind::TopMenu(_) => ViewTag::TopMenu,
            ViewKind::EmbeddedWeb(_) => ViewTag::EmbeddedWeb,
            ViewKind::UserMenu(_) => ViewTag::UserMenu,
            ViewKind::Image(_) => ViewTag::Image,
            ViewKind::AreaForm(_) => ViewTag::AreaForm,
            ViewKind::Panel(_) => ViewTag::Panel,
            ViewKind::Dialog(_) => ViewTag::Dialog,
            ViewKind::Unknown | ViewKind::Invalid { .. } => return None,
        })
    }
}

/// One node of a server-described UI tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub meta: NodeMeta,
    pub kind: ViewKind,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            meta: NodeMeta::default(),
            kind: ViewKind::Unknown,
        }
    }
}

impl ViewNode {
    #[inline]
    pub fn tag(&self) -> Option<ViewTag> {
        self.kind.tag()
    }

    #[inline]
    pub fn class(&self) -> &str {
        &self.meta.class
    }

    #[inline]
    pub fn has_class(&self) -> bool {
        !self.meta.class.is_empty()
    }

    #[inline]
    pub fn is(&self, tag: ViewTag) -> bool {
        self.tag() == Some(tag)
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.meta.name.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn title(&self) -> &str {
        self.meta.title.as_deref().unwrap_or("")
    }

    /// Declared children of composite nodes, in source order.
    pub fn children(&self) -> &[ViewNode] {
        match &self.kind {
            ViewKind::Window(p) => &p.rows,
            ViewKind::Form(p) => &p.components,
            ViewKind::Row(p) => &p.components,
            ViewKind::FormSection(p) => &p.components,
            ViewKind::Area(p) => &p.components,
            ViewKind::AreaForm(p) => &p.components,
            ViewKind::Panel(p) => &p.rows,
            ViewKind::Dialog(p) => &p.components,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_round_trip_through_the_lookup() {
        for tag in ViewTag::ALL {
            assert_eq!(ViewTag::from_class(tag.class_name()), Some(tag));
        }
        assert_eq!(ViewTag::from_class("GaugeView"), None);
        assert_eq!(ViewTag::from_class("windowview"), None);
    }
}
