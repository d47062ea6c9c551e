//! Rotation cursor arithmetic

/// Result of advancing the cursor by one position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Index of the topic to serve now
    pub index: u64,
    /// True when the cursor went back to the first topic
    pub wrapped: bool,
}

/// Compute the index after `last` in a list of `len` topics.
///
/// `last` may exceed the list when the topic file shrank; it is folded by the
/// same modulo. Returns `None` for an empty list.
pub fn advance(len: usize, last: u64) -> Option<Advance> {
    if len == 0 {
        return None;
    }

    let len = len as u64;
    let index = (last % len + 1) % len;

    Some(Advance {
        index,
        wrapped: index == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_forward() {
        for len in 1..=12usize {
            for last in 0..len as u64 {
                let next = advance(len, last).unwrap();
                assert_eq!(next.index, (last + 1) % len as u64);
            }
        }
    }

    #[test]
    fn test_advance_wraps_at_end() {
        let next = advance(3, 2).unwrap();
        assert_eq!(next.index, 0);
        assert!(next.wrapped);
    }

    #[test]
    fn test_advance_first_run_serves_second_topic() {
        let next = advance(10, 0).unwrap();
        assert_eq!(next.index, 1);
        assert!(!next.wrapped);
    }

    #[test]
    fn test_advance_single_topic_always_wraps() {
        let next = advance(1, 0).unwrap();
        assert_eq!(next.index, 0);
        assert!(next.wrapped);
    }

    #[test]
    fn test_advance_folds_stale_index() {
        let next = advance(3, 7).unwrap();
        assert_eq!(next.index, 2);
    }

    #[test]
    fn test_advance_handles_max_index() {
        let next = advance(10, u64::MAX).unwrap();
        assert_eq!(next.index, (u64::MAX % 10 + 1) % 10);
    }

    #[test]
    fn test_advance_empty_list() {
        assert!(advance(0, 0).is_none());
    }
}
