use std::cmp::Ordering;

use crate::SliceError;

/// Sort rows in place by a key, ascending and stable, with a bottom-up merge sort.
///
/// Runs of width `1, 2, 4, ...` are merged pairwise until a single run covers the input. A trailing
/// run without a partner is left in place for the next pass. Keys are compared with
/// [`f64::total_cmp`], so NaN keys are ordered after every finite key and equal keys keep their
/// input order.
///
/// # Arguments
///
/// * `rows` - The rows to sort.
/// * `key` - Extracts the sort key of a row.
///
/// Example:
///
/// ```
/// use scanslice_3d::sort::merge_sort_by_key;
///
/// let mut rows = vec![[3.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
/// merge_sort_by_key(&mut rows, |r| r[0]);
/// assert_eq!(rows, vec![[1.0, 1.0], [2.0, 2.0], [3.0, 0.0]]);
/// ```
pub fn merge_sort_by_key<T, F>(rows: &mut [T], key: F)
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    let len = rows.len();
    let mut size = 1;
    while size < len {
        for start in (0..len - size).step_by(2 * size) {
            let mid = start + size;
            let end = (mid + size).min(len);
            merge(rows, start, mid, end, &key);
        }
        size *= 2;
    }
}

/// Merge the sorted runs `rows[start..mid]` and `rows[mid..end]`.
fn merge<T, F>(rows: &mut [T], start: usize, mid: usize, end: usize, key: &F)
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    // runs already in order
    if key(&rows[mid - 1]).total_cmp(&key(&rows[mid])) != Ordering::Greater {
        return;
    }

    let mut merged = Vec::with_capacity(end - start);
    let (mut i, mut j) = (start, mid);
    while i < mid && j < end {
        // ties take the left run to keep the sort stable
        if key(&rows[i]).total_cmp(&key(&rows[j])) != Ordering::Greater {
            merged.push(rows[i].clone());
            i += 1;
        } else {
            merged.push(rows[j].clone());
            j += 1;
        }
    }
    merged.extend_from_slice(&rows[i..mid]);
    merged.extend_from_slice(&rows[j..end]);

    for (dst, src) in rows[start..end].iter_mut().zip(merged) {
        *dst = src;
    }
}

/// Sort point rows in place by one of their columns, ascending and stable.
///
/// All fields of a row move together. The column is checked against every row before any row is
/// moved, so on error the input is left untouched.
///
/// # Arguments
///
/// * `rows` - The point rows to sort.
/// * `column` - Index of the field used as the sort key.
///
/// # Errors
///
/// [`SliceError::ColumnOutOfRange`] if a row has no field at `column`.
///
/// Example:
///
/// ```
/// use scanslice_3d::sort::sort_by_column;
///
/// let mut rows = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 2.0]];
/// sort_by_column(&mut rows, 0).unwrap();
/// assert_eq!(rows, vec![vec![0.0, 2.0], vec![1.0, 0.0], vec![1.0, 1.0]]);
/// ```
pub fn sort_by_column<P>(rows: &mut [P], column: usize) -> Result<(), SliceError>
where
    P: AsRef<[f64]> + Clone,
{
    if let Some((index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.as_ref().len() <= column)
    {
        return Err(SliceError::ColumnOutOfRange {
            index,
            column,
            len: row.as_ref().len(),
        });
    }

    merge_sort_by_key(rows, |row| row.as_ref()[column]);

    Ok(())
}
