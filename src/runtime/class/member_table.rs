use std::rc::Rc;

use indexmap::IndexMap;

/// Flattened member table of one class.
///
/// Every name has one slot recording the entry declared at this level and
/// the entry copied from the parent when the class was declared. The `all`
/// view resolves a slot to its own entry when present.
#[derive(Debug, Clone)]
pub struct MemberTable<T> {
    slots: IndexMap<Rc<str>, Slot<T>>,
    fullname: IndexMap<Rc<str>, T>,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    own: Option<T>,
    inherited: Option<T>,
}

impl<T> Slot<T> {
    fn effective(&self) -> Option<&T> {
        self.own.as_ref().or(self.inherited.as_ref())
    }
}

impl<T> Default for MemberTable<T> {
    fn default() -> Self {
        Self {
            slots: IndexMap::new(),
            fullname: IndexMap::new(),
        }
    }
}

impl<T: Clone> MemberTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `parent`: its resolved entries become this table's
    /// inherited entries, its fullname entries are copied as is.
    pub fn inherit(parent: &MemberTable<T>) -> Self {
        let slots = parent
            .slots
            .iter()
            .filter_map(|(name, slot)| {
                slot.effective().map(|entry| {
                    (
                        name.clone(),
                        Slot {
                            own: None,
                            inherited: Some(entry.clone()),
                        },
                    )
                })
            })
            .collect();
        Self {
            slots,
            fullname: parent.fullname.clone(),
        }
    }

    /// Declares `name` at this level, overriding any inherited entry.
    pub fn declare(&mut self, name: Rc<str>, entry: T) {
        self.slots
            .entry(name)
            .or_insert(Slot {
                own: None,
                inherited: None,
            })
            .own = Some(entry);
    }

    /// Registers `entry` under `"<class>_<member>"`.
    pub fn register_fullname(&mut self, class: &str, member: &str, entry: T) {
        self.fullname
            .insert(format!("{}_{}", class, member).into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.slots.get(name).and_then(Slot::effective)
    }

    pub fn get_own(&self, name: &str) -> Option<&T> {
        self.slots.get(name).and_then(|slot| slot.own.as_ref())
    }

    pub fn get_inherited(&self, name: &str) -> Option<&T> {
        self.slots.get(name).and_then(|slot| slot.inherited.as_ref())
    }

    pub fn get_fullname(&self, key: &str) -> Option<&T> {
        self.fullname.get(key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn all(&self) -> IndexMap<Rc<str>, T> {
        self.collect(|slot| slot.effective())
    }

    pub fn own(&self) -> IndexMap<Rc<str>, T> {
        self.collect(|slot| slot.own.as_ref())
    }

    pub fn inherited(&self) -> IndexMap<Rc<str>, T> {
        self.collect(|slot| slot.inherited.as_ref())
    }

    /// `(true, true)` is the `all` view, a single flag selects that
    /// partition, `(false, false)` is empty.
    pub fn list(&self, own: bool, inherited: bool) -> IndexMap<Rc<str>, T> {
        match (own, inherited) {
            (true, true) => self.all(),
            (true, false) => self.own(),
            (false, true) => self.inherited(),
            (false, false) => IndexMap::new(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &Rc<str>> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.effective().is_some())
            .map(|(name, _)| name)
    }

    fn collect<'a>(
        &'a self,
        pick: impl Fn(&'a Slot<T>) -> Option<&'a T>,
    ) -> IndexMap<Rc<str>, T> {
        self.slots
            .iter()
            .filter_map(|(name, slot)| pick(slot).map(|entry| (name.clone(), entry.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_entries_override_inherited_ones() {
        let mut parent = MemberTable::new();
        parent.declare("a".into(), 1);
        parent.declare("b".into(), 2);

        let mut child = MemberTable::inherit(&parent);
        child.declare("b".into(), 20);
        child.declare("c".into(), 30);

        assert_eq!(child.get("a"), Some(&1));
        assert_eq!(child.get("b"), Some(&20));
        assert_eq!(child.get_inherited("b"), Some(&2));
        assert_eq!(child.own().len(), 2);
        assert_eq!(child.inherited().len(), 2);
        assert_eq!(child.all().len(), 3);
        assert!(child.list(false, false).is_empty());
    }

    #[test]
    fn inheriting_takes_a_snapshot() {
        let mut parent = MemberTable::new();
        parent.declare("a".into(), 1);
        let child = MemberTable::inherit(&parent);
        parent.declare("late".into(), 2);

        assert!(parent.contains("late"));
        assert!(!child.contains("late"));
    }

    #[test]
    fn fullnames_are_copied_down() {
        let mut parent = MemberTable::new();
        parent.register_fullname("A", "m", 'a');
        let mut child = MemberTable::inherit(&parent);
        child.register_fullname("B", "m", 'b');

        assert_eq!(child.get_fullname("A_m"), Some(&'a'));
        assert_eq!(child.get_fullname("B_m"), Some(&'b'));
        assert_eq!(parent.get_fullname("B_m"), None);
    }
}
