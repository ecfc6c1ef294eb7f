//! Object identifier type.

use std::fmt;

/// Identifies a cached object.
///
/// LCS traces store object ids as `u64`, so every id the reader produces
/// fits without conversion.
///
/// # Example
/// ```
/// use lcsim::ObjId;
///
/// let id = ObjId::new(42);
/// assert_eq!(id.0, 42);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u64);

impl ObjId {
    /// Create a new ObjId.
    #[inline]
    pub fn new(id: u64) -> Self {
        ObjId(id)
    }
}

impl From<u64> for ObjId {
    #[inline]
    fn from(id: u64) -> Self {
        ObjId(id)
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Obj({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obj_id_new() {
        let id = ObjId::new(42);
        assert_eq!(id.0, 42);
        assert_eq!(ObjId::from(42), id);
    }

    #[test]
    fn test_obj_id_ordering() {
        assert!(ObjId::new(1) < ObjId::new(2));
    }

    #[test]
    fn test_obj_id_display() {
        assert_eq!(format!("{}", ObjId::new(42)), "Obj(42)");
    }
}
