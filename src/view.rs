use crate::color::Color;
use cgmath::{Vector2, Zero};
use core::fmt;
use uuid::Uuid;

/// A unique identifier for a view.
///
/// (this is just a UUID)
///
/// IDs are never reused, so holding on to one never keeps a view alive and never aliases a view
/// created later.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(u32, u16, u16, [u8; 8]);

impl ViewId {
    pub(crate) fn new() -> ViewId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        ViewId(a, b, c, *d)
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // the first field is plenty to tell views apart in logs
        write!(f, "ViewId({:08x})", self.0)
    }
}

/// Width of one character in the fixed-width metric used for text preferred sizes.
pub const CHAR_WIDTH: f64 = 7.;

/// Line height used for text preferred sizes.
pub const LINE_HEIGHT: f64 = 16.;

/// Kinds of views.
///
/// These are descriptions only; painting and input are the business of whatever backend ends up
/// displaying the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewKind {
    /// A plain box that only groups subviews.
    Container,

    /// A box filled with a color, with a fixed preferred size.
    Fill { color: Color, preferred: Vector2<f64> },

    /// A push button with a text label.
    Button { label: String },

    /// Static text.
    Label { text: String },

    /// Clickable text. `tag` lets a shared handler tell links apart.
    Link { text: String, tag: u32 },

    /// An icon.
    Image { name: String },

    /// A viewport over a single content view.
    ScrollView { offset: f64 },

    /// A popup anchored to another view.
    Bubble { color: Color, anchor: Option<ViewId> },
}

impl ViewKind {
    /// Returns the preferred size of a view of this kind, disregarding subviews.
    pub fn preferred_size(&self) -> Vector2<f64> {
        fn text_size(text: &str, padding: f64) -> Vector2<f64> {
            Vector2::new(
                text.chars().count() as f64 * CHAR_WIDTH + 2. * padding,
                LINE_HEIGHT + 2. * padding,
            )
        }

        match self {
            ViewKind::Container | ViewKind::ScrollView { .. } | ViewKind::Bubble { .. } => {
                Vector2::zero()
            }
            ViewKind::Fill { preferred, .. } => *preferred,
            ViewKind::Button { label } => text_size(label, 6.),
            ViewKind::Label { text } | ViewKind::Link { text, .. } => text_size(text, 0.),
            ViewKind::Image { .. } => Vector2::new(16., 16.),
        }
    }
}

#[test]
fn test_view_ids_are_unique() {
    let a = ViewId::new();
    let b = ViewId::new();
    assert_ne!(a, b);
}

#[test]
fn test_text_preferred_size() {
    let size = ViewKind::Label {
        text: "abcd".into(),
    }
    .preferred_size();
    assert_eq!(size, Vector2::new(28., 16.));
}
