use crate::ids::ItemId;

/// SparseSetベースのモデルストレージ
/// - dense: 実際のモデル配列（連続メモリでイテレーションが速い）
/// - sparse: ItemId.index -> denseのインデックスへのマッピング
/// - items: denseと対応するItemIdの配列
pub struct ModelStorage<T> {
    dense: Vec<T>,
    items: Vec<ItemId>,
    sparse: Vec<Option<usize>>,
}

impl<T> ModelStorage<T> {
    /// 新しいストレージを作成
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            items: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// モデルを挿入（既存の場合は上書き）
    pub fn insert(&mut self, item: ItemId, model: T) {
        let index = item.index() as usize;

        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }

        if let Some(dense_index) = self.sparse[index] {
            self.dense[dense_index] = model;
        } else {
            let dense_index = self.dense.len();
            self.dense.push(model);
            self.items.push(item);
            self.sparse[index] = Some(dense_index);
        }
    }

    /// モデルを取得
    pub fn get(&self, item: ItemId) -> Option<&T> {
        self.sparse
            .get(item.index() as usize)
            .and_then(|opt| *opt)
            .map(|dense_index| &self.dense[dense_index])
    }

    /// モデルを取得（可変参照）
    pub fn get_mut(&mut self, item: ItemId) -> Option<&mut T> {
        self.sparse
            .get(item.index() as usize)
            .and_then(|opt| *opt)
            .map(|dense_index| &mut self.dense[dense_index])
    }

    /// モデルを削除（swap_removeでO(1)）
    pub fn remove(&mut self, item: ItemId) -> Option<T> {
        let index = item.index() as usize;
        let dense_index = self.sparse.get_mut(index)?.take()?;

        let last_index = self.dense.len() - 1;
        if dense_index != last_index {
            // 末尾要素のsparseを付け替える
            let last_item = self.items[last_index];
            self.sparse[last_item.index() as usize] = Some(dense_index);
        }

        self.items.swap_remove(dense_index);
        Some(self.dense.swap_remove(dense_index))
    }

    /// 全モデルをイテレート
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &T)> {
        self.items.iter().copied().zip(self.dense.iter())
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.sparse
            .get(item.index() as usize)
            .is_some_and(|opt| opt.is_some())
    }
}

impl<T> Default for ModelStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut storage = ModelStorage::new();
        storage.insert(ItemId::new(0), "curve");

        assert_eq!(storage.get(ItemId::new(0)), Some(&"curve"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut storage = ModelStorage::new();
        storage.insert(ItemId::new(0), 1);
        storage.insert(ItemId::new(0), 2);

        assert_eq!(storage.get(ItemId::new(0)), Some(&2));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_get_mut() {
        let mut storage = ModelStorage::new();
        storage.insert(ItemId::new(3), 1.0);

        if let Some(value) = storage.get_mut(ItemId::new(3)) {
            *value = 10.0;
        }

        assert_eq!(storage.get(ItemId::new(3)), Some(&10.0));
    }

    #[test]
    fn test_remove_middle() {
        let mut storage = ModelStorage::new();
        let (a, b, c) = (ItemId::new(0), ItemId::new(1), ItemId::new(2));
        storage.insert(a, 'a');
        storage.insert(b, 'b');
        storage.insert(c, 'c');

        // 中間要素を削除しても残りは取得できる
        assert_eq!(storage.remove(b), Some('b'));
        assert_eq!(storage.get(a), Some(&'a'));
        assert_eq!(storage.get(b), None);
        assert_eq!(storage.get(c), Some(&'c'));
        assert!(!storage.contains(b));
    }

    #[test]
    fn test_remove_nonexistent() {
        let mut storage: ModelStorage<u8> = ModelStorage::new();
        assert_eq!(storage.remove(ItemId::new(5)), None);
    }

    #[test]
    fn test_sparse_index_gap() {
        let mut storage = ModelStorage::new();
        // index 100に直接挿入（sparse配列が自動拡張される）
        storage.insert(ItemId::new(100), 7);
        assert_eq!(storage.get(ItemId::new(100)), Some(&7));
        assert_eq!(storage.iter().count(), 1);
    }
}
