use std::collections::BTreeMap;

/// Ordered in-memory table of structured rows with grouped reductions
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Table<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Table { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// Rows matching `pred`, borrowed, in original order
    pub fn filter<P>(&self, pred: P) -> Table<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.iter().filter(|r| pred(r)).collect()
    }

    /// Group rows by `key` and fold each group into an accumulator.
    ///
    /// Groups come back in ascending key order; rows are folded in table
    /// order within a group.
    pub fn group_reduce<K, A, F, I, G>(&self, key: F, init: I, fold: G) -> Vec<(K, A)>
    where
        K: Ord,
        F: Fn(&T) -> K,
        I: Fn() -> A,
        G: Fn(&mut A, &T),
    {
        let mut groups: BTreeMap<K, A> = BTreeMap::new();
        for row in &self.rows {
            let acc = groups.entry(key(row)).or_insert_with(&init);
            fold(acc, row);
        }
        groups.into_iter().collect()
    }

    pub fn column<F>(&self, value: F) -> Vec<f64>
    where
        F: Fn(&T) -> f64,
    {
        self.rows.iter().map(value).collect()
    }

    pub fn sum_by<F>(&self, value: F) -> f64
    where
        F: Fn(&T) -> f64,
    {
        self.rows.iter().map(value).sum()
    }

    pub fn count_where<P>(&self, pred: P) -> u64
    where
        P: Fn(&T) -> bool,
    {
        self.rows.iter().filter(|r| pred(r)).count() as u64
    }

    /// Arithmetic mean of a column, `None` for an empty table
    pub fn mean_by<F>(&self, value: F) -> Option<f64>
    where
        F: Fn(&T) -> f64,
    {
        if self.rows.is_empty() {
            return None;
        }
        Some(self.sum_by(value) / self.rows.len() as f64)
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table { rows: Vec::new() }
    }
}

impl<T> FromIterator<T> for Table<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Table { rows: iter.into_iter().collect() }
    }
}

impl<T> From<Vec<T>> for Table<T> {
    fn from(rows: Vec<T>) -> Self {
        Table::new(rows)
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
