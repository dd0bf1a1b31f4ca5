use bitflags::bitflags;

bitflags! {
    /// Active slowdown overlays on one actor.
    ///
    /// `DUAL` is derived: it is set exactly when both `CAST_LEFT` and
    /// `CAST_RIGHT` are set. [`ActorSlowState`](super::ActorSlowState) is the
    /// only place that mutates these flags, and it re-derives `DUAL` after
    /// every change.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct SlowFlags: u8 {
        const RANGED     = 1 << 0;
        const CAST_LEFT  = 1 << 1;
        const CAST_RIGHT = 1 << 2;
        const DUAL       = 1 << 3;
    }
}

impl SlowFlags {
    /// Both casting hands.
    pub const BOTH_HANDS: Self = Self::CAST_LEFT.union(Self::CAST_RIGHT);

    /// Returns the flags with `DUAL` recomputed from the hand flags.
    #[inline]
    pub fn with_derived_dual(self) -> Self {
        let mut flags = self;
        flags.set(Self::DUAL, self.contains(Self::BOTH_HANDS));
        flags
    }

    /// Returns true if `DUAL` agrees with the hand flags.
    #[inline]
    pub fn is_consistent(self) -> bool {
        self == self.with_derived_dual()
    }
}
