use crate::coords::Vec2;
use crate::render::resources::{SlotTexture, TextureId};
use crate::shapes::{Circle, FillMode, Rectangle, SPRITE_UVS, Shape, Sprite};

use super::{Batch, CircleVertex, QuadVertex};

/// Per-batch capacity limits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BatchLimits {
    /// Vertices a batch may hold before it is flushed.
    pub max_vertices: usize,
    /// Distinct textures one quad draw call may bind.
    pub max_texture_slots: usize,
}

impl BatchLimits {
    /// Upper bound on indices per batch. Every shape emits at most three
    /// indices per vertex (a filled circle fan is the worst case).
    #[inline]
    pub const fn max_indices(&self) -> usize {
        self.max_vertices * 3
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_vertices: 10_000,
            max_texture_slots: 32,
        }
    }
}

/// One flushed batch, borrowed for the duration of [`FlushSink::draw`].
#[derive(Debug)]
pub enum DrawCall<'a, T> {
    Quads {
        vertices: &'a [QuadVertex],
        indices: &'a [u32],
        /// Slot `i` is sampled by vertices whose `texture_index == i`.
        textures: &'a [T],
        fill: FillMode,
    },
    Circles {
        vertices: &'a [CircleVertex],
        indices: &'a [u32],
        fill: FillMode,
    },
}

impl<T> DrawCall<'_, T> {
    #[inline]
    pub fn fill(&self) -> FillMode {
        match self {
            DrawCall::Quads { fill, .. } | DrawCall::Circles { fill, .. } => *fill,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        match self {
            DrawCall::Quads { vertices, .. } => vertices.len(),
            DrawCall::Circles { vertices, .. } => vertices.len(),
        }
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        match self {
            DrawCall::Quads { indices, .. } | DrawCall::Circles { indices, .. } => indices.len(),
        }
    }

    #[inline]
    pub fn texture_count(&self) -> usize {
        match self {
            DrawCall::Quads { textures, .. } => textures.len(),
            DrawCall::Circles { .. } => 0,
        }
    }

    #[inline]
    pub fn class_name(&self) -> &'static str {
        match self {
            DrawCall::Quads { .. } => "quads",
            DrawCall::Circles { .. } => "circles",
        }
    }
}

/// Receives flushed batches in flush order.
pub trait FlushSink<T> {
    fn draw(&mut self, call: DrawCall<'_, T>);
}

/// Counters for one `begin`/`end` bracket.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub quad_flushes: u32,
    pub circle_flushes: u32,
    pub vertices: usize,
    pub indices: usize,
    /// Most texture slots bound by a single draw call.
    pub max_texture_slots: usize,
}

impl FrameStats {
    fn record<T>(&mut self, call: &DrawCall<'_, T>) {
        self.draw_calls += 1;
        match call {
            DrawCall::Quads { .. } => self.quad_flushes += 1,
            DrawCall::Circles { .. } => self.circle_flushes += 1,
        }
        self.vertices += call.vertex_count();
        self.indices += call.index_count();
        self.max_texture_slots = self.max_texture_slots.max(call.texture_count());
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BatcherState {
    Idle,
    Accumulating,
}

/// Immediate-mode batching state machine.
///
/// Primitives submitted between [`Batcher::begin`] and [`Batcher::end`] are
/// accumulated into a quad batch (rectangles and sprites) and a circle
/// batch. Before each append the target batch is flushed when:
///
/// 1. the primitive's fill mode differs from a non-empty batch's,
/// 2. its vertices would push the batch past `max_vertices`,
/// 3. it needs a texture that is not bound while every slot is taken.
///
/// After a flush the batch is empty, so the primitive is always appended
/// whole. Within a class draw order is submission order; `end` flushes quads
/// before circles.
#[derive(Debug)]
pub struct Batcher<T> {
    limits: BatchLimits,
    state: BatcherState,
    quads: Batch<QuadVertex, T>,
    circles: Batch<CircleVertex, T>,
    positions: Vec<Vec2>,
    local_indices: Vec<u32>,
    stats: FrameStats,
}

impl<T: SlotTexture> Batcher<T> {
    /// Panics if either limit is zero.
    pub fn new(limits: BatchLimits) -> Self {
        assert!(limits.max_vertices > 0, "BatchLimits::max_vertices must be non-zero");
        assert!(limits.max_texture_slots > 0, "BatchLimits::max_texture_slots must be non-zero");

        Self {
            limits,
            state: BatcherState::Idle,
            quads: Batch::with_capacity(limits.max_vertices, limits.max_texture_slots),
            circles: Batch::with_capacity(limits.max_vertices, 0),
            positions: Vec::new(),
            local_indices: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    #[inline]
    pub fn state(&self) -> BatcherState {
        self.state
    }

    #[inline]
    pub fn quads(&self) -> &Batch<QuadVertex, T> {
        &self.quads
    }

    #[inline]
    pub fn circles(&self) -> &Batch<CircleVertex, T> {
        &self.circles
    }

    /// Stats accumulated since the last `begin`.
    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Opens a frame with empty batches.
    pub fn begin(&mut self) {
        if self.state == BatcherState::Accumulating {
            log::warn!(
                "begin() on an open frame; discarding {} quad and {} circle vertices",
                self.quads.vertex_count(),
                self.circles.vertex_count()
            );
        }

        self.quads.clear();
        self.circles.clear();
        self.stats = FrameStats::default();
        self.state = BatcherState::Accumulating;
    }

    pub fn draw_rect<S>(&mut self, rect: &Rectangle, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        self.check_open("draw_rect");
        self.prepare_quads(rect.fill, rect.vertex_count(), None, sink);

        self.positions.clear();
        self.local_indices.clear();
        rect.write_vertices(&mut self.positions);
        rect.write_indices(0, &mut self.local_indices);

        let color = rect.color.to_array();
        self.quads.append(
            self.positions.iter().map(|p| QuadVertex {
                position: p.to_array(),
                uv: [0.0, 0.0],
                color,
                texture_index: QuadVertex::UNTEXTURED,
            }),
            &self.local_indices,
        );
    }

    pub fn draw_circle<S>(&mut self, circle: &Circle, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        self.check_open("draw_circle");
        self.prepare_circles(circle.fill, circle.vertex_count(), sink);

        self.positions.clear();
        self.local_indices.clear();
        circle.write_vertices(&mut self.positions);
        circle.write_indices(0, &mut self.local_indices);

        let color = circle.color.to_array();
        let center = circle.center.to_array();
        let radius = circle.radius;
        self.circles.append(
            self.positions.iter().map(|p| CircleVertex {
                position: p.to_array(),
                uv: [0.0, 0.0],
                color,
                center,
                radius,
            }),
            &self.local_indices,
        );
    }

    pub fn draw_sprite<S>(&mut self, sprite: &Sprite<T>, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        self.check_open("draw_sprite");
        let id = sprite.texture.texture_id();
        self.prepare_quads(FillMode::Filled, sprite.vertex_count(), Some(id), sink);

        let slot = match self.quads.texture_index_of(id) {
            Some(slot) => slot,
            None => match self.quads.add_texture_slot(sprite.texture.clone()) {
                Some(slot) => slot,
                None => {
                    log::error!("no free texture slot after flush; sprite dropped");
                    return;
                }
            },
        };

        self.positions.clear();
        self.local_indices.clear();
        sprite.write_vertices(&mut self.positions);
        sprite.write_indices(0, &mut self.local_indices);

        let color = sprite.color.to_array();
        let texture_index = slot as f32;
        self.quads.append(
            self.positions.iter().zip(SPRITE_UVS).map(|(p, uv)| QuadVertex {
                position: p.to_array(),
                uv,
                color,
                texture_index,
            }),
            &self.local_indices,
        );
    }

    pub fn submit<S>(&mut self, shape: &Shape<T>, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        match shape {
            Shape::Rectangle(r) => self.draw_rect(r, sink),
            Shape::Circle(c) => self.draw_circle(c, sink),
            Shape::Sprite(s) => self.draw_sprite(s, sink),
        }
    }

    /// Flushes both batches without closing the frame. Lets callers force
    /// everything submitted so far underneath what follows.
    pub fn flush<S>(&mut self, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        self.flush_quads(sink);
        self.flush_circles(sink);
    }

    /// Flushes pending batches and closes the frame.
    pub fn end<S>(&mut self, sink: &mut S) -> FrameStats
    where
        S: FlushSink<T> + ?Sized,
    {
        if self.state == BatcherState::Idle {
            log::warn!("end() without a matching begin()");
        }

        self.flush(sink);
        self.state = BatcherState::Idle;
        self.stats
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn check_open(&self, op: &str) {
        debug_assert_eq!(
            self.state,
            BatcherState::Accumulating,
            "{op} called outside begin()/end()"
        );
    }

    fn warn_oversized(&self, incoming: usize) {
        if incoming > self.limits.max_vertices {
            log::warn!(
                "primitive with {incoming} vertices exceeds the batch limit of {}",
                self.limits.max_vertices
            );
        }
    }

    fn prepare_quads<S>(
        &mut self,
        fill: FillMode,
        incoming: usize,
        texture: Option<TextureId>,
        sink: &mut S,
    ) where
        S: FlushSink<T> + ?Sized,
    {
        if self.quads.fill() != fill {
            self.flush_quads(sink);
            self.quads.set_fill(fill);
        }

        if self.quads.vertex_count() + incoming > self.limits.max_vertices {
            self.warn_oversized(incoming);
            self.flush_quads(sink);
        }

        if let Some(id) = texture
            && self.quads.texture_index_of(id).is_none()
            && self.quads.slots_full()
        {
            self.flush_quads(sink);
        }
    }

    fn prepare_circles<S>(&mut self, fill: FillMode, incoming: usize, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        if self.circles.fill() != fill {
            self.flush_circles(sink);
            self.circles.set_fill(fill);
        }

        if self.circles.vertex_count() + incoming > self.limits.max_vertices {
            self.warn_oversized(incoming);
            self.flush_circles(sink);
        }
    }

    fn flush_quads<S>(&mut self, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        if self.quads.is_empty() {
            return;
        }

        let call = DrawCall::Quads {
            vertices: self.quads.vertices(),
            indices: self.quads.indices(),
            textures: self.quads.textures(),
            fill: self.quads.fill(),
        };
        emit(&mut self.stats, call, sink);
        self.quads.clear();
    }

    fn flush_circles<S>(&mut self, sink: &mut S)
    where
        S: FlushSink<T> + ?Sized,
    {
        if self.circles.is_empty() {
            return;
        }

        let call: DrawCall<'_, T> = DrawCall::Circles {
            vertices: self.circles.vertices(),
            indices: self.circles.indices(),
            fill: self.circles.fill(),
        };
        emit(&mut self.stats, call, sink);
        self.circles.clear();
    }
}

fn emit<T, S>(stats: &mut FrameStats, call: DrawCall<'_, T>, sink: &mut S)
where
    S: FlushSink<T> + ?Sized,
{
    log::trace!(
        "flush {} ({:?}): {} vertices, {} indices, {} textures",
        call.class_name(),
        call.fill(),
        call.vertex_count(),
        call.index_count(),
        call.texture_count()
    );
    stats.record(&call);
    sink.draw(call);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Recorded {
        Quads {
            vertices: Vec<QuadVertex>,
            indices: Vec<u32>,
            textures: Vec<TextureId>,
            fill: FillMode,
        },
        Circles {
            vertices: Vec<CircleVertex>,
            indices: Vec<u32>,
            fill: FillMode,
        },
    }

    impl Recorded {
        fn index_count(&self) -> usize {
            match self {
                Recorded::Quads { indices, .. } | Recorded::Circles { indices, .. } => {
                    indices.len()
                }
            }
        }

        fn vertex_count(&self) -> usize {
            match self {
                Recorded::Quads { vertices, .. } => vertices.len(),
                Recorded::Circles { vertices, .. } => vertices.len(),
            }
        }

        fn fill(&self) -> FillMode {
            match self {
                Recorded::Quads { fill, .. } | Recorded::Circles { fill, .. } => *fill,
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Recorded>,
    }

    impl FlushSink<TextureId> for RecordingSink {
        fn draw(&mut self, call: DrawCall<'_, TextureId>) {
            self.calls.push(match call {
                DrawCall::Quads { vertices, indices, textures, fill } => Recorded::Quads {
                    vertices: vertices.to_vec(),
                    indices: indices.to_vec(),
                    textures: textures.to_vec(),
                    fill,
                },
                DrawCall::Circles { vertices, indices, fill } => Recorded::Circles {
                    vertices: vertices.to_vec(),
                    indices: indices.to_vec(),
                    fill,
                },
            });
        }
    }

    /// Handle whose liveness is observable through a shared `Rc`.
    #[derive(Clone)]
    struct Tracked {
        id: TextureId,
        live: Rc<()>,
    }

    impl SlotTexture for Tracked {
        fn texture_id(&self) -> TextureId {
            self.id
        }
    }

    /// Keeps every texture it draws with, like a recorded pass does.
    #[derive(Default)]
    struct RetainingSink {
        held: Vec<Tracked>,
        live_at_draw: Vec<usize>,
    }

    impl FlushSink<Tracked> for RetainingSink {
        fn draw(&mut self, call: DrawCall<'_, Tracked>) {
            if let DrawCall::Quads { textures, .. } = call {
                for texture in textures {
                    self.live_at_draw.push(Rc::strong_count(&texture.live));
                    self.held.push(texture.clone());
                }
            }
        }
    }

    fn rect(i: usize) -> Rectangle {
        Rectangle::new(Vec2::new(i as f32, 0.0), Vec2::new(4.0, 4.0), Color::WHITE)
    }

    fn sprite(texture: u64) -> Sprite<TextureId> {
        Sprite::new(TextureId::from_raw(texture), Vec2::zero(), Vec2::new(16.0, 16.0))
    }

    fn open(limits: BatchLimits) -> (Batcher<TextureId>, RecordingSink) {
        let mut b = Batcher::new(limits);
        b.begin();
        (b, RecordingSink::default())
    }

    #[test]
    fn same_fill_rects_flush_once_at_end() {
        for (fill, per_rect) in [(FillMode::Filled, 6), (FillMode::Outlined, 8)] {
            for n in [1, 7, 2_500] {
                let (mut b, mut sink) = open(BatchLimits::default());
                for i in 0..n {
                    b.draw_rect(&rect(i).with_fill(fill), &mut sink);
                }
                assert!(sink.calls.is_empty(), "no flush before end()");

                let stats = b.end(&mut sink);
                assert_eq!(sink.calls.len(), 1);
                assert_eq!(sink.calls[0].index_count(), per_rect * n);
                assert_eq!(sink.calls[0].fill(), fill);
                assert_eq!(stats.draw_calls, 1);
            }
        }
    }

    #[test]
    fn circle_counts_reach_the_sink() {
        let (mut b, mut sink) = open(BatchLimits::default());
        let filled = Circle::new(Vec2::new(5.0, 5.0), 3.0, Color::WHITE).with_segments(16);
        b.draw_circle(&filled, &mut sink);
        b.draw_circle(&filled.outlined(), &mut sink);
        b.end(&mut sink);

        assert_eq!(sink.calls.len(), 2);
        assert_eq!((sink.calls[0].vertex_count(), sink.calls[0].index_count()), (17, 48));
        assert_eq!((sink.calls[1].vertex_count(), sink.calls[1].index_count()), (16, 32));

        let Recorded::Circles { vertices, .. } = &sink.calls[0] else {
            panic!("expected a circle draw");
        };
        assert!(vertices.iter().all(|v| v.center == [5.0, 5.0] && v.radius == 3.0));
    }

    #[test]
    fn repeated_texture_uses_one_slot() {
        let (mut b, mut sink) = open(BatchLimits::default());
        for _ in 0..10 {
            b.draw_sprite(&sprite(99), &mut sink);
        }
        b.end(&mut sink);

        assert_eq!(sink.calls.len(), 1);
        let Recorded::Quads { vertices, textures, .. } = &sink.calls[0] else {
            panic!("expected a quad draw");
        };
        assert_eq!(textures, &vec![TextureId::from_raw(99)]);
        assert_eq!(vertices.len(), 40);
        assert!(vertices.iter().all(|v| v.texture_index == 0.0));
    }

    #[test]
    fn fill_change_splits_draw_calls() {
        let (mut b, mut sink) = open(BatchLimits::default());
        b.draw_rect(&rect(0), &mut sink);
        b.draw_rect(&rect(1).outlined(), &mut sink);
        b.end(&mut sink);

        assert_eq!(sink.calls.len(), 2);
        assert_eq!(sink.calls[0].fill(), FillMode::Filled);
        assert_eq!(sink.calls[0].index_count(), 6);
        assert_eq!(sink.calls[1].fill(), FillMode::Outlined);
        assert_eq!(sink.calls[1].index_count(), 8);
        assert!(sink.calls.iter().all(|c| c.vertex_count() == 4));
    }

    #[test]
    fn slot_overflow_forces_flush() {
        let (mut b, mut sink) = open(BatchLimits::default());
        for t in 0..33 {
            b.draw_sprite(&sprite(t), &mut sink);
        }
        let stats = b.end(&mut sink);

        assert!(sink.calls.len() >= 2);
        assert_eq!(stats.max_texture_slots, 32);

        let mut next = 0u64;
        for call in &sink.calls {
            let Recorded::Quads { vertices, textures, .. } = call else {
                panic!("expected quad draws only");
            };
            assert!(textures.len() <= 32);
            for quad in vertices.chunks(4) {
                let slot = quad[0].slot().expect("sprite vertices are textured");
                assert_eq!(textures[slot], TextureId::from_raw(next));
                next += 1;
            }
        }
        assert_eq!(next, 33);
    }

    #[test]
    fn empty_frame_issues_no_draws() {
        let (mut b, mut sink) = open(BatchLimits::default());
        let stats = b.end(&mut sink);

        assert!(sink.calls.is_empty());
        assert_eq!(stats, FrameStats::default());
        assert_eq!(b.state(), BatcherState::Idle);
        assert!(b.quads().is_empty() && b.circles().is_empty());
    }

    #[test]
    fn vertex_limit_flushes_before_append() {
        let limits = BatchLimits {
            max_vertices: 8,
            max_texture_slots: 4,
        };
        let (mut b, mut sink) = open(limits);
        for i in 0..3 {
            b.draw_rect(&rect(i), &mut sink);
        }
        assert_eq!(sink.calls.len(), 1, "third rect does not fit");

        b.end(&mut sink);
        assert_eq!(sink.calls.len(), 2);
        assert_eq!(sink.calls[0].vertex_count(), 8);
        assert_eq!(sink.calls[1].vertex_count(), 4);
        assert_eq!(sink.calls[1].index_count(), 6);
    }

    #[test]
    fn oversized_primitive_is_appended_whole() {
        let limits = BatchLimits {
            max_vertices: 8,
            max_texture_slots: 4,
        };
        let (mut b, mut sink) = open(limits);
        let big = Circle::new(Vec2::zero(), 1.0, Color::WHITE).with_segments(16);
        b.draw_circle(&big, &mut sink);
        b.end(&mut sink);

        assert_eq!(sink.calls.len(), 1);
        assert_eq!(sink.calls[0].vertex_count(), 17);
    }

    #[test]
    fn rects_and_sprites_share_the_quad_batch() {
        let (mut b, mut sink) = open(BatchLimits::default());
        b.submit(&Shape::Rectangle(rect(0)), &mut sink);
        b.submit(&Shape::Sprite(sprite(3)), &mut sink);
        b.end(&mut sink);

        assert_eq!(sink.calls.len(), 1);
        let Recorded::Quads { vertices, indices, .. } = &sink.calls[0] else {
            panic!("expected a quad draw");
        };
        assert_eq!(vertices[0].slot(), None);
        assert_eq!(vertices[4].slot(), Some(0));
        assert_eq!(vertices[4].uv, [0.0, 1.0]);
        assert_eq!(&indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn quads_flush_before_circles_at_end() {
        let (mut b, mut sink) = open(BatchLimits::default());
        b.draw_circle(&Circle::new(Vec2::zero(), 2.0, Color::WHITE), &mut sink);
        b.draw_rect(&rect(0), &mut sink);
        let stats = b.end(&mut sink);

        assert!(matches!(sink.calls[0], Recorded::Quads { .. }));
        assert!(matches!(sink.calls[1], Recorded::Circles { .. }));
        assert_eq!((stats.quad_flushes, stats.circle_flushes), (1, 1));
    }

    #[test]
    fn explicit_flush_preserves_submission_order() {
        let (mut b, mut sink) = open(BatchLimits::default());
        b.draw_circle(&Circle::new(Vec2::zero(), 2.0, Color::WHITE), &mut sink);
        b.flush(&mut sink);
        b.draw_rect(&rect(0), &mut sink);
        b.end(&mut sink);

        assert!(matches!(sink.calls[0], Recorded::Circles { .. }));
        assert!(matches!(sink.calls[1], Recorded::Quads { .. }));
    }

    #[test]
    fn indices_stay_inside_each_draw() {
        let limits = BatchLimits {
            max_vertices: 50,
            max_texture_slots: 2,
        };
        let (mut b, mut sink) = open(limits);
        for i in 0..40 {
            match i % 4 {
                0 => b.draw_rect(&rect(i), &mut sink),
                1 => b.draw_sprite(&sprite(i as u64 % 5), &mut sink),
                2 => b.draw_circle(&Circle::new(Vec2::zero(), 1.0, Color::WHITE), &mut sink),
                _ => b.draw_rect(&rect(i).outlined(), &mut sink),
            }
        }
        let stats = b.end(&mut sink);

        for call in &sink.calls {
            let (indices, n) = match call {
                Recorded::Quads { indices, vertices, .. } => (indices, vertices.len()),
                Recorded::Circles { indices, vertices, .. } => (indices, vertices.len()),
            };
            assert!(n <= 50 || indices.is_empty());
            assert!(indices.iter().all(|&i| (i as usize) < n));
        }
        assert_eq!(stats.draw_calls as usize, sink.calls.len());
        assert!(stats.max_texture_slots <= 2);
    }

    #[test]
    fn begin_discards_an_unfinished_frame() {
        let (mut b, mut sink) = open(BatchLimits::default());
        b.draw_rect(&rect(0), &mut sink);
        b.begin();
        b.end(&mut sink);
        assert!(sink.calls.is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside begin()/end()")]
    fn drawing_while_idle_is_a_usage_error() {
        let mut b: Batcher<TextureId> = Batcher::new(BatchLimits::default());
        b.draw_rect(&rect(0), &mut RecordingSink::default());
    }

    #[test]
    #[should_panic(expected = "max_texture_slots")]
    fn zero_slot_limit_is_rejected() {
        let _ = Batcher::<TextureId>::new(BatchLimits {
            max_vertices: 10,
            max_texture_slots: 0,
        });
    }

    #[test]
    fn sprite_texture_outlives_its_flush_when_the_caller_let_go() {
        let live = Rc::new(());
        let watch = Rc::downgrade(&live);
        let mut b: Batcher<Tracked> = Batcher::new(BatchLimits::default());
        b.begin();
        let mut sink = RetainingSink::default();
        let texture = Tracked {
            id: TextureId::from_raw(9),
            live,
        };

        b.draw_sprite(
            &Sprite::new(texture, Vec2::zero(), Vec2::new(8.0, 8.0)),
            &mut sink,
        );
        // The temporary sprite is gone; the batch slot holds the only handle.
        assert_eq!(watch.strong_count(), 1);

        b.end(&mut sink);
        assert_eq!(sink.live_at_draw, vec![1]);
        // Released by the batch, still held by the recorded draw.
        assert_eq!(watch.strong_count(), 1);

        drop(sink);
        assert_eq!(watch.strong_count(), 0);
    }
}
