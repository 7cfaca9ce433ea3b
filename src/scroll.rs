use tokio::sync::watch;

/// Offset past which the "back to top" affordance is shown.
pub const SCROLL_TOP_THRESHOLD_PX: u32 = 300;

/// Nominal height of one terminal row, in pixels.
pub const CELL_HEIGHT_PX: u32 = 16;

/// Vertical scroll position of the movie list.
///
/// The offset is published on a watch channel; observers obtained from
/// [`Viewport::subscribe`] stay registered exactly as long as they live.
pub struct Viewport {
    offset: watch::Sender<u32>,
    /// Set while a smooth scroll to the top is running.
    animating: bool,
}

impl Viewport {
    pub fn new() -> Self {
        let (offset, _) = watch::channel(0);
        Self {
            offset,
            animating: false,
        }
    }

    pub fn offset_px(&self) -> u32 {
        *self.offset.borrow()
    }

    pub fn offset_rows(&self) -> usize {
        (self.offset_px() / CELL_HEIGHT_PX) as usize
    }

    /// Jump to an absolute offset. Cancels a running smooth scroll.
    pub fn scroll_to(&mut self, offset_px: u32) {
        self.animating = false;
        self.offset.send_replace(offset_px);
    }

    /// Keep the row at `row` inside a window of `height` rows.
    pub fn follow_row(&mut self, row: usize, height: usize) {
        let top = self.offset_rows();
        let height = height.max(1);
        let new_top = if row < top {
            row
        } else if row >= top + height {
            row + 1 - height
        } else {
            return;
        };
        self.scroll_to(new_top as u32 * CELL_HEIGHT_PX);
    }

    /// Start a smooth scroll back to offset 0.
    pub fn scroll_to_top(&mut self) {
        self.animating = self.offset_px() > 0;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Advance a running smooth scroll by one frame: halve the distance,
    /// moving at least one row.
    pub fn tick(&mut self) {
        if !self.animating {
            return;
        }
        let current = self.offset_px();
        let next = (current / 2).min(current.saturating_sub(CELL_HEIGHT_PX));
        self.offset.send_replace(next);
        if next == 0 {
            self.animating = false;
        }
    }

    /// Register an observer. It is deregistered when dropped.
    pub fn subscribe(&self, threshold_px: u32) -> ScrollObserver {
        let mut observer = ScrollObserver {
            rx: self.offset.subscribe(),
            threshold_px,
            show_scroll_top: false,
        };
        observer.sample();
        tracing::trace!(observers = self.observer_count(), "scroll observer registered");
        observer
    }

    pub fn observer_count(&self) -> usize {
        self.offset.receiver_count()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks whether the viewport is scrolled far enough to offer "back to top".
#[derive(Debug)]
pub struct ScrollObserver {
    rx: watch::Receiver<u32>,
    threshold_px: u32,
    show_scroll_top: bool,
}

impl ScrollObserver {
    /// Pick up the latest offset if it changed. Returns whether the flag flipped.
    pub fn refresh(&mut self) -> bool {
        if !self.rx.has_changed().unwrap_or(false) {
            return false;
        }
        let before = self.show_scroll_top;
        self.sample();
        before != self.show_scroll_top
    }

    fn sample(&mut self) {
        let offset = *self.rx.borrow_and_update();
        self.show_scroll_top = offset > self.threshold_px;
    }

    pub fn show_scroll_top(&self) -> bool {
        self.show_scroll_top
    }
}
