/// Whether a shape is drawn as solid triangles or as line segments along
/// its boundary.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FillMode {
    #[default]
    Filled,
    Outlined,
}

impl FillMode {
    #[inline]
    pub fn is_filled(self) -> bool {
        self == FillMode::Filled
    }
}
