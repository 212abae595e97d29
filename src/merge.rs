//! One stage of the bitonic comparison network, restricted to a single
//! unit of the sequence.
//!
//! Direction bits come from *global* indices: the comparison at global index
//! `i` inside a sub-network of width `k` runs ascending when `i & k == 0`.
//! For every `k` smaller than the unit width the unit's base offset has no
//! influence on that bit, but for `k` equal to the unit width it makes
//! odd-numbered units merge descending. That alternation is what leaves two
//! adjacent units bitonic, ready for the merge pass of the next phase.
//! Callers therefore work on a local span but must pass the unit's global
//! starting offset.

/// Fully sorts a unit with the complete network, `k` from 2 up to the unit
/// width. Used for the initial minimum-width units, which start unsorted.
pub fn sort_unit(span: &mut [i32], base: usize) {
    debug_assert!(span.len().is_power_of_two() || span.len() <= 1);
    debug_assert!(span.is_empty() || base % span.len() == 0);

    let mut k = 2;
    while k <= span.len() {
        network_pass(span, base, k);
        k *= 2;
    }
}

/// Runs only the final `k = width` pass. Valid once the unit's two halves
/// are each fully sorted from the previous phase, which makes the unit as a
/// whole bitonic.
pub fn merge_unit(span: &mut [i32], base: usize) {
    debug_assert!(span.len().is_power_of_two() || span.len() <= 1);
    debug_assert!(span.is_empty() || base % span.len() == 0);

    if span.len() > 1 {
        network_pass(span, base, span.len());
    }
}

/// Half-cleaner cascade for sub-network width `k`: stride `j` halves from
/// `k / 2` down to 1, each element compared with its partner `i ^ j`.
fn network_pass(span: &mut [i32], base: usize, k: usize) {
    let mut j = k / 2;
    while j > 0 {
        for i in 0..span.len() {
            let l = i ^ j;
            if l > i {
                let ascending = (base + i) & k == 0;
                let out_of_order = if ascending {
                    span[i] > span[l]
                } else {
                    span[i] < span[l]
                };
                if out_of_order {
                    span.swap(i, l);
                }
            }
        }
        j /= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_network_matches_stdlib() {
        for exp in 0..10 {
            let len = 1usize << exp;
            // Deterministic scramble, enough to hit every exchange lane.
            let mut span: Vec<i32> = (0..len as i32)
                .map(|i| i.wrapping_mul(2654435761u32 as i32) % 1000)
                .collect();
            let mut expected = span.clone();
            expected.sort_unstable();

            sort_unit(&mut span, 0);
            assert_eq!(span, expected, "len {len}");
        }
    }

    #[test]
    fn merge_pass_on_bitonic_input() {
        // Ascending half followed by descending half, the shape a unit has
        // after the previous phase sorted its halves in opposite directions.
        let mut span = vec![1, 3, 5, 7, 8, 6, 4, 2];
        merge_unit(&mut span, 0);
        assert_eq!(span, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn odd_slot_merges_descending() {
        // Same bitonic input, but placed at an odd unit slot (base = width).
        let mut span = vec![1, 3, 5, 7, 8, 6, 4, 2];
        let base = span.len();
        merge_unit(&mut span, base);
        assert_eq!(span, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn full_sort_at_odd_slot_is_descending() {
        let mut span = vec![5, 1, 4, 8, 2, 7, 3, 6];
        let base = span.len();
        sort_unit(&mut span, base);
        assert_eq!(span, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn staged_phases_reproduce_full_sort() {
        // Drive the phase schedule by hand over a 16 element sequence:
        // width-2 full sorts, then width 4, 8, 16 merge passes.
        let mut seq: Vec<i32> = vec![12, 3, 15, 0, 9, 6, 1, 14, 7, 10, 4, 13, 2, 11, 8, 5];
        let mut expected = seq.clone();
        expected.sort_unstable();

        let min_width = 2;
        let mut width = min_width;
        while width <= seq.len() {
            let units = seq.len() / width;
            for m in 0..units {
                let base = m * width;
                let span = &mut seq[base..base + width];
                if width == min_width {
                    sort_unit(span, base);
                } else {
                    merge_unit(span, base);
                }
            }
            width *= 2;
        }

        assert_eq!(seq, expected);
    }

    #[test]
    fn tiny_units_are_no_ops() {
        let mut empty: Vec<i32> = vec![];
        sort_unit(&mut empty, 0);
        merge_unit(&mut empty, 0);

        let mut one = vec![42];
        sort_unit(&mut one, 0);
        merge_unit(&mut one, 0);
        assert_eq!(one, [42]);
    }

    #[test]
    fn equal_keys_survive_both_directions() {
        let mut span = vec![2, 2, 1, 1];
        sort_unit(&mut span, 0);
        assert_eq!(span, [1, 1, 2, 2]);

        let mut span = vec![2, 2, 1, 1];
        let base = span.len();
        sort_unit(&mut span, base);
        assert_eq!(span, [2, 2, 1, 1]);
    }
}
