//! A popup panel listing video files with their sizes, each with a "Save" link.
//!
//! Clicking "Save all" rebuilds the list. Any other link, a row's "Save" or the title, appends a
//! row and keeps the scroll position.

use super::{size_to_preferred, DemoError};
use crate::animator::BoundsTarget;
use crate::events::{Event, EventKind};
use crate::host::HostContext;
use crate::rect::Rect;
use crate::tick::TickSource;
use crate::tree::{TreeError, ViewTree};
use crate::view::{ViewId, ViewKind};
use cgmath::{Point2, Vector2};
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;

pub const VIEW_HEIGHT_MAX: f64 = 420.;
pub const VIEW_BORDER_SIZE: f64 = 1.;
pub const VIEW_HOR_MARGIN: f64 = 12.;
pub const VIEW_VER_MARGIN: f64 = 3.;
pub const SCROLL_BAR_WIDTH: f64 = 15.;

/// Tags of the panel’s links.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTag {
    Save = 0,
    CopyLink = 1,
    SaveAll = 2,
    Setting = 3,
}

impl LinkTag {
    pub fn from_u32(tag: u32) -> Option<LinkTag> {
        match tag {
            0 => Some(LinkTag::Save),
            1 => Some(LinkTag::CopyLink),
            2 => Some(LinkTag::SaveAll),
            3 => Some(LinkTag::Setting),
            _ => None,
        }
    }
}

/// Formats a byte count for display.
///
/// Zero and `u32::MAX` mean the size is not known.
pub fn size_text(bytes: u32) -> String {
    if bytes == 0 || bytes == u32::max_value() {
        return "unknown size".to_string();
    }
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let kb = bytes / 1024;
    if kb < 1024 {
        return format!("{} KB", kb);
    }
    let mb = f64::from(kb) / 1024.;
    if mb < 1024. {
        format!("{:.2} MB", mb)
    } else {
        format!("{:.2} GB", mb / 1024.)
    }
}

/// A file offered for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    pub name: String,
    /// Size in bytes.
    pub length: u32,
}

impl VideoItem {
    pub fn new(name: impl Into<String>, length: u32) -> VideoItem {
        VideoItem {
            name: name.into(),
            length,
        }
    }
}

/// The list a freshly opened panel shows.
pub fn initial_items() -> Vec<VideoItem> {
    let mut items = vec![
        VideoItem::new("all roads lead to rome, all roads lead to rome file1.flv", 3 * 1024 + 3),
        VideoItem::new("file2.flv", (1024. * 1024. * 6.2) as u32),
        VideoItem::new("https://chromium.googlesource.com/android_tools.git.flv", 300),
        VideoItem::new("file4.flv", 1024),
        VideoItem::new("file5.flv", 1235),
    ];
    for i in 0..3 {
        items.push(VideoItem::new(format!("filename{}.flv", i), i * (1 << 30)));
    }
    items
}

/// The item appended by a row’s "Save" link.
pub fn appended_item() -> VideoItem {
    VideoItem::new("filename333.flv", 1024 * 1024)
}

/// Hands out row group IDs; never repeats one.
#[derive(Debug, Default, Clone)]
pub struct GroupCounter {
    next: u32,
}

impl GroupCounter {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy)]
enum ColumnWidth {
    Fixed(f64),
    Preferred,
}

/// `(padding before, width)` for the icon, name, size and link columns.
const COLUMNS: [(f64, ColumnWidth); 4] = [
    (12., ColumnWidth::Fixed(19.)),
    (3., ColumnWidth::Fixed(120.)),
    (12., ColumnWidth::Preferred),
    (12., ColumnWidth::Preferred),
];
const TRAILING_PADDING: f64 = 12.;

/// One row of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub group: u32,
    /// Icon, name, size, and "Save" link.
    pub cells: [ViewId; 4],
}

impl Row {
    pub fn link(&self) -> ViewId {
        self.cells[3]
    }
}

#[derive(Debug)]
struct PanelState {
    rows: Vec<Row>,
    groups: GroupCounter,
}

/// View IDs of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelViews {
    pub panel: ViewId,
    pub title_bar: ViewId,
    pub title: ViewId,
    pub save_all: ViewId,
    pub scroll_view: ViewId,
    pub content: ViewId,
}

/// The save panel.
#[derive(Debug, Clone)]
pub struct VideoSavePanel {
    pub views: PanelViews,
    state: Arc<Mutex<PanelState>>,
}

impl VideoSavePanel {
    /// Builds the panel inside `parent` and fills it with the initial items.
    ///
    /// The panel is not sized; see [`VideoSavePanel::preferred_size`].
    pub fn build<T: TickSource + 'static>(
        ctx: &mut HostContext<T>,
        parent: ViewId,
    ) -> Result<VideoSavePanel, TreeError> {
        let tree = &mut ctx.tree;
        let panel = tree.add_view(parent, ViewKind::Container)?;
        let title_bar = tree.add_view(panel, ViewKind::Container)?;
        let title = tree.add_view(
            title_bar,
            ViewKind::Link {
                text: "Resource list".into(),
                tag: LinkTag::Setting as u32,
            },
        )?;
        let save_all = tree.add_view(
            title_bar,
            ViewKind::Link {
                text: "Save all".into(),
                tag: LinkTag::SaveAll as u32,
            },
        )?;
        let scroll_view = tree.add_view(panel, ViewKind::ScrollView { offset: 0. })?;
        let content = tree.add_view(scroll_view, ViewKind::Container)?;

        let this = VideoSavePanel {
            views: PanelViews {
                panel,
                title_bar,
                title,
                save_all,
                scroll_view,
                content,
            },
            state: Arc::new(Mutex::new(PanelState {
                rows: Vec::new(),
                groups: GroupCounter::default(),
            })),
        };

        this.listen(ctx, title);
        this.listen(ctx, save_all);
        this.init_content(ctx)?;
        Ok(this)
    }

    fn listen<T: TickSource + 'static>(&self, ctx: &mut HostContext<T>, link: ViewId) {
        let this = self.clone();
        ctx.on(link, EventKind::LinkClicked, move |event, ctx| {
            if let Err(err) = this.link_clicked(ctx, event) {
                warn!("video save panel: {}", err);
            }
        });
    }

    pub fn rows(&self) -> Vec<Row> {
        self.state.lock().rows.clone()
    }

    /// Replaces all rows with the initial items.
    pub fn init_content<T: TickSource + 'static>(
        &self,
        ctx: &mut HostContext<T>,
    ) -> Result<(), TreeError> {
        ctx.clear_subviews(self.views.content)?;
        self.state.lock().rows.clear();
        self.set_scroll_offset(&mut ctx.tree, 0.)?;

        for item in initial_items() {
            self.add_row(ctx, &item)?;
        }
        self.layout_content(&mut ctx.tree)
    }

    /// Appends a row. Does not lay out.
    pub fn add_row<T: TickSource + 'static>(
        &self,
        ctx: &mut HostContext<T>,
        item: &VideoItem,
    ) -> Result<Row, TreeError> {
        let content = self.views.content;
        let cells = [
            ctx.tree.add_view(
                content,
                ViewKind::Image {
                    name: "folder_open".into(),
                },
            )?,
            ctx.tree.add_view(
                content,
                ViewKind::Label {
                    text: item.name.clone(),
                },
            )?,
            ctx.tree.add_view(
                content,
                ViewKind::Label {
                    text: size_text(item.length),
                },
            )?,
            ctx.tree.add_view(
                content,
                ViewKind::Link {
                    text: "Save".into(),
                    tag: LinkTag::Save as u32,
                },
            )?,
        ];

        let group = self.state.lock().groups.next();
        for cell in &cells {
            ctx.tree.set_group(*cell, group)?;
        }
        let row = Row { group, cells };
        self.listen(ctx, row.link());
        self.state.lock().rows.push(row);
        Ok(row)
    }

    fn link_clicked<T: TickSource + 'static>(
        &self,
        ctx: &mut HostContext<T>,
        event: &Event,
    ) -> Result<(), DemoError> {
        let tag = match ctx.tree.kind(event.source) {
            Some(ViewKind::Link { tag, .. }) => LinkTag::from_u32(*tag),
            _ => None,
        };
        debug!("link {:?} clicked ({:?})", event.source, tag);

        match tag {
            Some(LinkTag::SaveAll) => {
                self.init_content(ctx)?;
                self.size_to_preferred(&mut ctx.tree)?;
            }
            // every other link saves, including the title
            Some(LinkTag::Save) | Some(LinkTag::CopyLink) | Some(LinkTag::Setting) | None => {
                let offset = self.scroll_offset(&ctx.tree);
                self.add_row(ctx, &appended_item())?;
                self.layout_content(&mut ctx.tree)?;
                self.size_to_preferred(&mut ctx.tree)?;
                if offset != 0. {
                    self.set_scroll_offset(&mut ctx.tree, offset)?;
                }
            }
        }
        Ok(())
    }

    fn preferred_of(tree: &ViewTree, id: ViewId) -> Vector2<f64> {
        tree.kind(id)
            .map_or(Vector2::new(0., 0.), |kind| kind.preferred_size())
    }

    /// Column widths and the row height of the grid.
    fn grid_metrics(&self, tree: &ViewTree) -> ([f64; 4], f64) {
        let rows = self.state.lock().rows.clone();
        let mut widths = [0.; 4];
        let mut row_height: f64 = 0.;
        for (i, (_, width)) in COLUMNS.iter().enumerate() {
            widths[i] = match width {
                ColumnWidth::Fixed(width) => *width,
                ColumnWidth::Preferred => rows
                    .iter()
                    .map(|row| Self::preferred_of(tree, row.cells[i]).x)
                    .fold(0., f64::max),
            };
        }
        for row in &rows {
            for cell in &row.cells {
                row_height = row_height.max(Self::preferred_of(tree, *cell).y);
            }
        }
        (widths, row_height)
    }

    /// Preferred size of the row grid.
    pub fn content_preferred_size(&self, tree: &ViewTree) -> Vector2<f64> {
        let (widths, row_height) = self.grid_metrics(tree);
        let rows = self.state.lock().rows.len() as f64;
        let width = COLUMNS
            .iter()
            .zip(widths.iter())
            .map(|((padding, _), width)| padding + width)
            .sum::<f64>()
            + TRAILING_PADDING;
        let height = VIEW_VER_MARGIN + rows * (row_height + VIEW_VER_MARGIN);
        Vector2::new(width, height)
    }

    /// Preferred size of the title bar.
    pub fn title_bar_preferred_size(&self, tree: &ViewTree) -> Vector2<f64> {
        let title = Self::preferred_of(tree, self.views.title);
        let save_all = Self::preferred_of(tree, self.views.save_all);
        Vector2::new(
            title.x + save_all.x + VIEW_HOR_MARGIN * 2.,
            title.y.max(save_all.y) + VIEW_VER_MARGIN * 2.,
        )
    }

    /// Preferred size of the whole panel: title bar plus content, capped in height.
    pub fn preferred_size(&self, tree: &ViewTree) -> Vector2<f64> {
        let toolbar = self.title_bar_preferred_size(tree);
        let mut size = self.content_preferred_size(tree);
        size.y += toolbar.y;

        if size.y > VIEW_HEIGHT_MAX {
            size.y = VIEW_HEIGHT_MAX;
            size.x += SCROLL_BAR_WIDTH;
        }
        size + Vector2::new(VIEW_BORDER_SIZE * 2., VIEW_BORDER_SIZE * 2.)
    }

    /// Resizes the panel to its preferred size, keeping its origin, and lays it out.
    pub fn size_to_preferred(&self, tree: &mut ViewTree) -> Result<(), TreeError> {
        let panel = self.views.panel;
        let origin = tree
            .bounds(panel)
            .ok_or(TreeError::NoSuchView(panel))?
            .origin;
        tree.set_bounds(panel, Rect::new(origin, self.preferred_size(tree)));
        self.layout(tree)
    }

    /// Lays out the title bar, the scroll view and the rows.
    pub fn layout(&self, tree: &mut ViewTree) -> Result<(), TreeError> {
        let v = self.views;
        let bounds = tree.bounds(v.panel).ok_or(TreeError::NoSuchView(v.panel))?;
        let toolbar = self.title_bar_preferred_size(tree);

        tree.set_bounds(v.title_bar, Rect::from_xywh(0., 0., bounds.width(), toolbar.y));
        let title = Self::preferred_of(tree, v.title);
        tree.set_bounds(
            v.title,
            Rect::new(Point2::new(VIEW_HOR_MARGIN, VIEW_VER_MARGIN), title),
        );
        let save_all = Self::preferred_of(tree, v.save_all);
        tree.set_bounds(
            v.save_all,
            Rect::new(
                Point2::new(bounds.width() - save_all.x - VIEW_HOR_MARGIN, VIEW_VER_MARGIN),
                save_all,
            ),
        );

        tree.set_bounds(
            v.scroll_view,
            Rect::from_xywh(
                VIEW_BORDER_SIZE,
                toolbar.y + VIEW_BORDER_SIZE,
                (bounds.width() - VIEW_BORDER_SIZE * 2.).max(0.),
                (bounds.height() - toolbar.y - VIEW_BORDER_SIZE * 2.).max(0.),
            ),
        );

        self.layout_content(tree)?;
        // the viewport may have changed size
        let offset = self.scroll_offset(tree);
        self.set_scroll_offset(tree, offset)
    }

    /// Positions the rows and sizes the content view to the grid.
    fn layout_content(&self, tree: &mut ViewTree) -> Result<(), TreeError> {
        let (widths, row_height) = self.grid_metrics(tree);
        let size = self.content_preferred_size(tree);
        let content = self.views.content;
        let y_offset = tree.bounds(content).map_or(0., |b| b.y());
        tree.set_bounds(content, Rect::new(Point2::new(0., y_offset), size));

        let rows = self.state.lock().rows.clone();
        let mut y = VIEW_VER_MARGIN;
        for row in &rows {
            let mut x = 0.;
            for (i, ((padding, _), width)) in COLUMNS.iter().zip(widths.iter()).enumerate() {
                x += padding;
                let preferred = Self::preferred_of(tree, row.cells[i]);
                // leading alignment; the cell fills the row vertically
                tree.set_bounds(
                    row.cells[i],
                    Rect::from_xywh(x, y, preferred.x.min(*width), row_height),
                );
                x += width;
            }
            y += row_height + VIEW_VER_MARGIN;
        }
        Ok(())
    }

    /// How far the content is scrolled down.
    pub fn scroll_offset(&self, tree: &ViewTree) -> f64 {
        match tree.kind(self.views.scroll_view) {
            Some(ViewKind::ScrollView { offset }) => *offset,
            _ => 0.,
        }
    }

    /// The largest valid scroll offset.
    pub fn max_scroll_offset(&self, tree: &ViewTree) -> f64 {
        let viewport = tree
            .bounds(self.views.scroll_view)
            .map_or(0., |b| b.height());
        let content = tree.bounds(self.views.content).map_or(0., |b| b.height());
        (content - viewport).max(0.)
    }

    /// Scrolls the content, clamping to the valid range.
    pub fn set_scroll_offset(&self, tree: &mut ViewTree, offset: f64) -> Result<(), TreeError> {
        let offset = offset.max(0.).min(self.max_scroll_offset(tree));
        let scroll_view = self.views.scroll_view;
        match tree.kind_mut(scroll_view) {
            Some(ViewKind::ScrollView { offset: current }) => *current = offset,
            _ => return Err(TreeError::NoSuchView(scroll_view)),
        }

        let content = self.views.content;
        let bounds = tree.bounds(content).ok_or(TreeError::NoSuchView(content))?;
        tree.set_bounds(content, bounds.with_origin(Point2::new(bounds.x(), -offset)));
        Ok(())
    }
}

/// The demo: a button that pops up the save panel underneath itself.
#[derive(Debug, Clone)]
pub struct VideoSaveDemo {
    pub button: ViewId,
    /// Parent of the popup.
    pub layer: ViewId,
    popup: Arc<Mutex<Option<VideoSavePanel>>>,
}

impl VideoSaveDemo {
    pub fn build<T: TickSource + 'static>(
        ctx: &mut HostContext<T>,
        container: ViewId,
        layer: ViewId,
    ) -> Result<VideoSaveDemo, TreeError> {
        let button = ctx.tree.add_view(
            container,
            ViewKind::Button {
                label: "Save".into(),
            },
        )?;
        size_to_preferred(&mut ctx.tree, button)?;

        let demo = VideoSaveDemo {
            button,
            layer,
            popup: Arc::new(Mutex::new(None)),
        };
        let this = demo.clone();
        ctx.on(button, EventKind::Pressed, move |_, ctx| {
            if let Err(err) = this.popup_panel(ctx) {
                warn!("video save: {}", err);
            }
        });
        Ok(demo)
    }

    /// The panel currently popped up.
    pub fn panel(&self) -> Option<VideoSavePanel> {
        self.popup.lock().clone()
    }

    /// Shows a fresh panel below the button, replacing any previous one.
    pub fn popup_panel<T: TickSource + 'static>(
        &self,
        ctx: &mut HostContext<T>,
    ) -> Result<VideoSavePanel, TreeError> {
        let mut popup = self.popup.lock();
        if let Some(previous) = popup.take() {
            // the panel may have been removed by someone else
            let _ = ctx.remove_view(previous.views.panel);
        }

        let anchor = ctx
            .tree
            .bounds(self.button)
            .ok_or(TreeError::NoSuchView(self.button))?;
        let panel = VideoSavePanel::build(ctx, self.layer)?;
        ctx.tree.set_bounds(
            panel.views.panel,
            Rect::from_xywh(anchor.x(), anchor.y() + anchor.height(), 0., 0.),
        );
        panel.size_to_preferred(&mut ctx.tree)?;

        *popup = Some(panel.clone());
        Ok(panel)
    }
}
