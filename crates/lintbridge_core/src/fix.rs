//! Applying fixed text to an editor buffer.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Cursor position in a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPos {
    pub line: u32,
    pub ch: u32,
}

/// Scroll offset of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollPos {
    pub x: i32,
    pub y: i32,
}

/// Cursor and scroll state restored after a fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub cursor: CursorPos,
    pub scroll: ScrollPos,
}

/// The host's current editor and its document.
///
/// Methods take `&self`; hosts are expected to wrap their own handles.
pub trait Editor: Send + Sync {
    /// Path of the document, `None` for untitled buffers.
    fn path(&self) -> Option<PathBuf>;

    /// Current, possibly unsaved, text.
    fn text(&self) -> String;

    fn viewport(&self) -> Viewport;

    /// Replaces the whole buffer content.
    fn replace_text(&self, text: &str);

    fn restore_viewport(&self, viewport: Viewport);

    /// Keeps the document alive until the matching [`Editor::release_ref`].
    fn add_ref(&self);

    fn release_ref(&self);

    /// Saves the document to disk.
    fn save(&self) -> std::io::Result<()>;
}

/// Holds a document reference for the lifetime of the guard.
#[derive(Debug)]
pub struct DocumentHold<'a, E: Editor + ?Sized> {
    editor: &'a E,
}

impl<'a, E: Editor + ?Sized> DocumentHold<'a, E> {
    pub fn acquire(editor: &'a E) -> Self {
        editor.add_ref();
        Self { editor }
    }
}

impl<E: Editor + ?Sized> Drop for DocumentHold<'_, E> {
    fn drop(&mut self) {
        self.editor.release_ref();
    }
}

/// Buffer state captured when a fix starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub path: PathBuf,
    pub text: String,
    pub viewport: Viewport,
}

impl EditorSnapshot {
    /// Captures the editor state, or `None` when the document has no path.
    pub fn capture<E: Editor + ?Sized>(editor: &E) -> Option<Self> {
        Some(Self {
            path: editor.path()?,
            text: editor.text(),
            viewport: editor.viewport(),
        })
    }
}

/// What a fix did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixApplied {
    /// The buffer was replaced and the viewport restored.
    Replaced,
    /// The text was already in canonical style; nothing was touched.
    Unchanged,
    /// The fix could not be produced; the buffer is untouched.
    Failed(String),
}

/// Fixed text produced by the tool, before it reaches an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedText {
    Changed(String),
    Unchanged,
    Failed(String),
}

impl FixedText {
    /// Compares the tool output with the input it was given.
    pub fn compare(original: &str, fixed: String) -> Self {
        if fixed == original {
            FixedText::Unchanged
        } else {
            FixedText::Changed(fixed)
        }
    }
}

/// Writes `fixed` into the editor unless it equals the snapshot text.
///
/// Replacing text moves the cursor in most editors, so the captured viewport
/// is put back afterwards.
pub fn apply_fix<E: Editor + ?Sized>(
    editor: &E,
    snapshot: &EditorSnapshot,
    fixed: &str,
) -> FixApplied {
    if fixed == snapshot.text {
        debug!("{} already styled", snapshot.path.display());
        return FixApplied::Unchanged;
    }

    editor.replace_text(fixed);
    editor.restore_viewport(snapshot.viewport);
    FixApplied::Replaced
}

/// Fix-on-save preference and the state of its save listener.
///
/// While a save-triggered fix runs, the listener is detached so the
/// programmatic re-save cannot start another fix.
#[derive(Debug, Default)]
pub struct FixOnSave {
    enabled: AtomicBool,
    attached: AtomicBool,
    /// Set while a [`ListenerDetached`] guard is alive.
    fixing: AtomicBool,
}

impl FixOnSave {
    /// Turns fix-on-save on or off, attaching or detaching the listener.
    ///
    /// While a save-triggered fix runs, only the preference changes; the
    /// guard's drop decides whether to reattach.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        if !self.fixing.load(Ordering::Acquire) {
            self.attached.store(enabled, Ordering::Release);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Whether a save event would currently trigger a fix.
    pub fn is_listening(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Detaches the listener for the lifetime of the returned guard.
    ///
    /// Returns `None` when the listener is not attached.
    pub fn detach(&self) -> Option<ListenerDetached<'_>> {
        self.attached
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.fixing.store(true, Ordering::Release);
        Some(ListenerDetached { owner: self })
    }
}

/// Reattaches the save listener on drop, unless fix-on-save was turned off.
#[derive(Debug)]
pub struct ListenerDetached<'a> {
    owner: &'a FixOnSave,
}

impl Drop for ListenerDetached<'_> {
    fn drop(&mut self) {
        self.owner.fixing.store(false, Ordering::Release);
        if self.owner.is_enabled() {
            self.owner.attached.store(true, Ordering::Release);
        }
    }
}
