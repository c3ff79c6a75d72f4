use super::options::{ReaderOptions, WriterOptions};

/// Per-depth bookkeeping slot of a decode pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    /// Entries consumed so far in this structure.
    pub index: usize,
    /// Entries still to come, for formats that announce a count up front.
    pub remaining: Option<usize>,
}

/// Mutable state of one decode pass.
#[derive(Debug)]
pub struct ReadContext {
    options: ReaderOptions,
    depth: usize,
    frames: Vec<Frame>,
}

impl ReadContext {
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            options,
            depth: 0,
            frames: Vec::new(),
        }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Frame of the innermost open structure.
    pub fn frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn frame_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
        self.frames.push(Frame::default());
    }

    pub(crate) fn advance(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.index += 1;
        }
    }

    pub(crate) fn exit(&mut self) {
        self.frames.pop();
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Mutable state of one encode pass.
#[derive(Debug)]
pub struct WriteContext {
    options: WriterOptions,
    depth: usize,
    max_key_width: usize,
    lengths: Vec<usize>,
}

impl WriteContext {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            options,
            depth: 0,
            max_key_width: 0,
            lengths: Vec::new(),
        }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Longest key of the map currently being written, in characters.
    pub fn max_key_width(&self) -> usize {
        self.max_key_width
    }

    /// Number of entries the innermost structure will write.
    pub fn entry_count(&self) -> Option<usize> {
        self.lengths.last().copied()
    }

    /// Spaces of pretty indentation at the current depth.
    pub fn indentation(&self) -> usize {
        self.options.indent_factor * self.depth
    }

    pub(crate) fn set_max_key_width(&mut self, width: usize) {
        self.max_key_width = width;
    }

    pub(crate) fn open(&mut self, len: usize) {
        self.lengths.push(len);
    }

    pub(crate) fn close(&mut self) {
        self.lengths.pop();
    }

    pub(crate) fn descend(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
