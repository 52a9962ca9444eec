/// Linedef flag bits as stored in `LineDef::flags`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDefFlags {
    /// Players and monsters cannot cross this line
    Blocking = 1,
    /// Monsters cannot cross this line
    BlockMonsters = 1 << 1,
    /// Backside will not be present at all if not two sided
    TwoSided = 1 << 2,
    /// The upper texture is pasted onto the wall from the top down instead
    /// of from the bottom up like usual
    UnpegTop = 1 << 3,
    /// Lower and middle textures are drawn from the bottom up, instead of
    /// from the top down like usual
    UnpegBottom = 1 << 4,
    /// In the automap, don't map as two sided. It's a secret!
    Secret = 1 << 5,
    /// Sound rendering: don't let sound cross two of these
    SoundBlock = 1 << 6,
    /// Don't draw on the automap at all
    DontDraw = 1 << 7,
    /// Set if already seen, thus drawn in automap
    Mapped = 1 << 8,
}

impl LineDefFlags {
    #[inline]
    pub const fn is_set(self, flags: u32) -> bool {
        flags & self as u32 != 0
    }
}
