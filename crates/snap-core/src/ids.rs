use std::fmt;
use std::num::NonZeroU32;

/// 永続モデル（アイテム）の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// ストレージ上のインデックスを取得
    #[inline]
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// トポロジー要素（面・稜線）の識別子
/// - item: 所有するアイテム
/// - index: アイテム内の要素番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopologyId {
    pub item: ItemId,
    pub kind: TopologyKind,
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    Face,
    Edge,
}

impl TopologyId {
    pub fn face(item: ItemId, index: u32) -> Self {
        Self { item, kind: TopologyKind::Face, index }
    }

    pub fn edge(item: ItemId, index: u32) -> Self {
        Self { item, kind: TopologyKind::Edge, index }
    }
}

impl fmt::Display for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TopologyKind::Face => "face",
            TopologyKind::Edge => "edge",
        };
        write!(f, "{}/{}#{}", self.item, kind, self.index)
    }
}

/// ジオメトリキャッシュの点バッファハンドル（世代番号付き）
/// - index: キャッシュ内の点グループ番号
/// - generation: 発行時のキャッシュ世代（update()後の古いハンドル検出用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    index: u32,
    generation: Generation,
}

impl BufferHandle {
    pub fn new(index: u32, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// グループ番号を取得
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// 世代番号を取得
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl fmt::Display for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}@{}", self.index, self.generation)
    }
}

/// キャッシュ世代番号
/// 0は無効値として予約（NonZeroU32で表現）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(NonZeroU32);

impl Generation {
    pub const FIRST: Generation = Generation(NonZeroU32::MIN);

    /// 次の世代（u32上限で1に戻る）
    pub fn next(self) -> Self {
        Self(self.0.checked_add(1).unwrap_or(NonZeroU32::MIN))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_accessors() {
        let handle = BufferHandle::new(42, Generation::FIRST);
        assert_eq!(handle.index(), 42);
        assert_eq!(handle.generation().get(), 1);
    }

    #[test]
    fn test_handle_equality_includes_generation() {
        let a = BufferHandle::new(1, Generation::FIRST);
        let b = BufferHandle::new(1, Generation::FIRST);
        let c = BufferHandle::new(1, Generation::FIRST.next());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generation_next() {
        let g = Generation::FIRST.next().next();
        assert_eq!(g.get(), 3);
        assert!(g > Generation::FIRST);
    }

    #[test]
    fn test_topology_display() {
        let id = TopologyId::edge(ItemId::new(3), 7);
        assert_eq!(id.to_string(), "item#3/edge#7");
        assert_ne!(TopologyId::face(ItemId::new(3), 7), id);
    }
}
