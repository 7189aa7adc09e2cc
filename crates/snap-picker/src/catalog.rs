//! スナップカタログ
//!
//! 基本スナップ、ジオメトリ由来の点スナップ群、交差スナップを列挙し、
//! 変更時に購読者へ通知する

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use snap_core::{PointSnap, Snap};

/// 購読ID
pub type SubscriptionId = u32;

/// 変更通知コールバック
pub type ChangeListener = Box<dyn Fn()>;

/// カタログのスナップショット
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// 原点・ワールド軸などの基本スナップ
    pub basic: Vec<Snap>,
    /// ジオメトリごとの点スナップ群
    pub geometry: Vec<Vec<PointSnap>>,
    /// 交差スナップ
    pub cross: Vec<Snap>,
}

/// スナップカタログの提供元
pub trait SnapCatalog {
    fn enabled(&self) -> bool;

    /// 現在の全スナップ
    fn snapshot(&self) -> CatalogSnapshot;

    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// 購読マネージャー
pub struct Subscriptions {
    listeners: HashMap<SubscriptionId, Rc<dyn Fn()>>,
    next_id: SubscriptionId,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, Rc::from(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// 現在の購読者の一覧
    pub fn listeners(&self) -> Vec<Rc<dyn Fn()>> {
        self.listeners.values().cloned().collect()
    }

    /// 全購読者に通知
    pub fn notify(&self) {
        for listener in self.listeners() {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}

/// メモリ上のスナップカタログ
/// 変更操作ごとに購読者へ通知する
pub struct SnapManager {
    enabled: Cell<bool>,
    snapshot: RefCell<CatalogSnapshot>,
    subscriptions: RefCell<Subscriptions>,
}

impl SnapManager {
    pub fn new() -> Self {
        Self::with_snapshot(CatalogSnapshot::default())
    }

    pub fn with_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            enabled: Cell::new(true),
            snapshot: RefCell::new(snapshot),
            subscriptions: RefCell::new(Subscriptions::new()),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.replace(enabled) != enabled {
            self.notify();
        }
    }

    pub fn push_basic(&self, snap: Snap) {
        self.snapshot.borrow_mut().basic.push(snap);
        self.notify();
    }

    /// 点スナップ群を追加し、その番号を返す
    pub fn push_geometry(&self, points: Vec<PointSnap>) -> usize {
        let index = {
            let mut snapshot = self.snapshot.borrow_mut();
            snapshot.geometry.push(points);
            snapshot.geometry.len() - 1
        };
        self.notify();
        index
    }

    pub fn push_cross(&self, snap: Snap) {
        self.snapshot.borrow_mut().cross.push(snap);
        self.notify();
    }

    pub fn replace(&self, snapshot: CatalogSnapshot) {
        *self.snapshot.borrow_mut() = snapshot;
        self.notify();
    }

    pub fn clear(&self) {
        self.replace(CatalogSnapshot::default());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    // 一覧を複製して借用を解放してから呼ぶ（購読者が購読・解除できるように）
    fn notify(&self) {
        let listeners = self.subscriptions.borrow().listeners();
        for listener in listeners {
            listener();
        }
    }
}

impl Default for SnapManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapCatalog for SnapManager {
    fn enabled(&self) -> bool {
        self.enabled.get()
    }

    fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.borrow().clone()
    }

    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        let id = self.subscriptions.borrow_mut().subscribe(listener);
        log::debug!("catalog subscription {} added", id);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.borrow_mut().unsubscribe(id);
        if removed {
            log::debug!("catalog subscription {} removed", id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::rc::Rc;

    fn counter(manager: &SnapManager) -> (Rc<Cell<u32>>, SubscriptionId) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let id = manager.subscribe(Box::new(move || seen.set(seen.get() + 1)));
        (count, id)
    }

    #[test]
    fn test_mutations_notify() {
        let manager = SnapManager::new();
        let (count, _) = counter(&manager);

        manager.push_basic(Snap::from(PointSnap::new(Vec3::ZERO)));
        let index = manager.push_geometry(vec![PointSnap::new(Vec3::X)]);
        manager.push_cross(Snap::from(PointSnap::new(Vec3::Y)));

        assert_eq!(index, 0);
        assert_eq!(count.get(), 3);

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.basic.len(), 1);
        assert_eq!(snapshot.geometry, vec![vec![PointSnap::new(Vec3::X)]]);
        assert_eq!(snapshot.cross.len(), 1);
    }

    #[test]
    fn test_set_enabled_notifies_only_on_change() {
        let manager = SnapManager::new();
        let (count, _) = counter(&manager);

        manager.set_enabled(true);
        assert_eq!(count.get(), 0);
        manager.set_enabled(false);
        assert_eq!(count.get(), 1);
        assert!(!manager.enabled());
    }

    #[test]
    fn test_unsubscribe() {
        let manager = SnapManager::new();
        let (count, id) = counter(&manager);

        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
        manager.clear();
        assert_eq!(count.get(), 0);
        assert_eq!(manager.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let manager = Rc::new(SnapManager::new());
        let own_id = Rc::new(Cell::new(None));
        let calls = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&manager);
        let (id_slot, seen) = (Rc::clone(&own_id), Rc::clone(&calls));
        let id = manager.subscribe(Box::new(move || {
            seen.set(seen.get() + 1);
            if let (Some(manager), Some(id)) = (weak.upgrade(), id_slot.get()) {
                assert!(manager.unsubscribe(id));
            }
        }));
        own_id.set(Some(id));

        manager.set_enabled(false);
        manager.set_enabled(true);
        assert_eq!(calls.get(), 1);
        assert_eq!(manager.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_can_subscribe_during_notify() {
        let manager = Rc::new(SnapManager::new());
        let weak = Rc::downgrade(&manager);
        manager.subscribe(Box::new(move || {
            if let Some(manager) = weak.upgrade() {
                manager.subscribe(Box::new(|| {}));
            }
        }));

        manager.push_basic(Snap::from(PointSnap::new(Vec3::ZERO)));
        assert_eq!(manager.subscriber_count(), 2);
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let mut subscriptions = Subscriptions::new();
        let a = subscriptions.subscribe(Box::new(|| {}));
        let b = subscriptions.subscribe(Box::new(|| {}));
        assert_ne!(a, b);
        assert_eq!(subscriptions.len(), 2);
    }
}
