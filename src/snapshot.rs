//! Accessibility-tree snapshot documents posted to the probe endpoint.
//!
//! A snapshot names a test case (`id`) and describes the UI Automation
//! elements a browser is expected to expose for it. Snapshots are built once
//! from a fixture and never mutated; everything outside this module reads
//! them through accessors.

use serde::{Deserialize, Serialize};

use crate::error::ProbeResult;

/// UI Automation control type tags, serialized by variant name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlType {
    Unknown,
    Button,
    Calendar,
    Checkbox,
    Combobox,
    Edit,
    Hyperlink,
    Image,
    Listitem,
    List,
    Menu,
    Menubar,
    Menuitem,
    Progressbar,
    Radiobutton,
    Scrollbar,
    Slider,
    Spinner,
    Statusbar,
    Tab,
    Tabitem,
    Text,
    Toolbar,
    Tooltip,
    Tree,
    Treeitem,
    Custom,
    Group,
    Thumb,
    Datagrid,
    Dataitem,
    Document,
    Splitbutton,
    Window,
    Pane,
    Header,
    Headeritem,
    Table,
    Titlebar,
    Separator,
    Semanticzoom,
    Appbar,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    id: String,
    #[serde(rename = "UIA")]
    uia: UiaTree,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiaTree {
    elements: Vec<Element>,
}

// Field order is wire order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(
        rename = "ControlType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    control_type: Option<ControlType>,
    #[serde(
        rename = "LocalizedControlType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    localized_control_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    patterns: Vec<Pattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Element>,
}

/// A control pattern the element must support, with the property values it
/// must report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<PatternProperty>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternProperty {
    name: String,
    value: String,
}

const PLACEHOLDER_NAME: &str = "Placeholder content";

const AUDIO_CONTROLS: [&str; 6] = [
    "Play",
    "Time elapsed/Skip back",
    "Seek",
    "Time remaining/Skip ahead",
    "Mute",
    "Volume",
];

impl Snapshot {
    /// The `audio` element: a group exposing the six media controls.
    pub fn audio() -> Self {
        let player = Element {
            control_type: Some(ControlType::Group),
            localized_control_type: Some("audio".to_string()),
            name: Some(PLACEHOLDER_NAME.to_string()),
            children: AUDIO_CONTROLS.iter().map(|name| Element::named(*name)).collect(),
            ..Element::default()
        };
        Self::single("audio", player)
    }

    /// A checkbox that must report `ToggleState = Off` through `TogglePattern`.
    pub fn checkbox() -> Self {
        let checkbox = Element {
            control_type: Some(ControlType::Checkbox),
            localized_control_type: Some("check box".to_string()),
            name: Some(PLACEHOLDER_NAME.to_string()),
            patterns: vec![Pattern {
                name: "TogglePattern".to_string(),
                properties: vec![PatternProperty {
                    name: "ToggleState".to_string(),
                    value: "Off".to_string(),
                }],
            }],
            ..Element::default()
        };
        Self::single("checkbox", checkbox)
    }

    fn single(id: &str, element: Element) -> Self {
        Self {
            id: id.to_string(),
            uia: UiaTree {
                elements: vec![element],
            },
        }
    }

    pub fn from_json(bytes: &[u8]) -> ProbeResult<Self> {
        Ok(sonic_rs::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> ProbeResult<Vec<u8>> {
        Ok(sonic_rs::to_vec(self)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn elements(&self) -> &[Element] {
        &self.uia.elements
    }

    /// Every element in the document, depth first.
    pub fn walk(&self) -> impl Iterator<Item = &Element> {
        self.uia.elements.iter().flat_map(Element::walk)
    }
}

impl Element {
    fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn control_type(&self) -> Option<ControlType> {
        self.control_type
    }

    pub fn localized_control_type(&self) -> Option<&str> {
        self.localized_control_type.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// This element followed by its descendants, depth first.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        Box::new(std::iter::once(self).chain(self.children.iter().flat_map(Element::walk)))
    }
}

impl Pattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[PatternProperty] {
        &self.properties
    }
}

impl PatternProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
