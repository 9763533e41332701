//! Active-pointer bookkeeping for the unified pointer event stream.

/// Browser pointer id, unique per active contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
    Unknown,
}

impl PointerKind {
    /// Maps the DOM `pointerType` string.
    pub fn from_pointer_type(value: &str) -> Self {
        match value {
            "mouse" => PointerKind::Mouse,
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Unknown,
        }
    }
}

/// Last known position of one active pointer, in viewport coordinates.
#[derive(Clone, Copy, Debug)]
pub struct PointerRecord {
    pub id: PointerId,
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
}

/// Set of currently-active pointers, ordered by contact time.
///
/// Two or three concurrent pointers is the realistic ceiling, so a plain Vec
/// keeps iteration order (first contact first) without hashing.
#[derive(Debug, Default)]
pub struct PointerSet {
    records: Vec<PointerRecord>,
}

impl PointerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PointerRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            self.records.push(record);
        }
    }

    /// Updates the position of a tracked pointer. Returns false for an id we
    /// are not tracking, which callers treat as an ignorable stray event.
    pub fn update(&mut self, id: PointerId, x: f64, y: f64) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.x = x;
                record.y = y;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: PointerId) -> Option<PointerRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn contains(&self, id: PointerId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: PointerId) -> Option<PointerRecord> {
        self.records.iter().copied().find(|r| r.id == id)
    }

    /// The earliest still-active contact.
    pub fn first(&self) -> Option<PointerRecord> {
        self.records.first().copied()
    }

    /// The two earliest contacts, when at least two pointers are active.
    pub fn pair(&self) -> Option<(PointerRecord, PointerRecord)> {
        match self.records.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
