use model::{core::value::Value, records::table::ResultTable};
use std::{cmp::Ordering, collections::HashMap};

/// Keeps at most `n` rows per word form: the ones with the highest
/// frequency, ties going to the earlier row. Survivors keep their original
/// order. Tables without `form` or `frequency` are left untouched.
pub fn top_per_form(table: &mut ResultTable, n: usize) {
    let (Some(form), Some(freq)) = (table.column_index("form"), table.column_index("frequency"))
    else {
        return;
    };

    let mut groups: HashMap<&Value, Vec<usize>> = HashMap::new();
    for (pos, row) in table.rows.iter().enumerate() {
        groups.entry(&row[form]).or_default().push(pos);
    }

    let mut keep = vec![false; table.len()];
    for positions in groups.values_mut() {
        positions.sort_by(|&a, &b| {
            let (a, b) = (&table.rows[a][freq], &table.rows[b][freq]);
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
        for &pos in positions.iter().take(n) {
            keep[pos] = true;
        }
    }

    table.retain_positions(|pos| keep[pos]);
}
