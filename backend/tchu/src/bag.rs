use im::OrdMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::{repeat, FromIterator};

/// An immutable multiset, iterated in ascending order.
///
/// Hands, discard piles and offered ticket or card sets are all bags:
/// repetitions matter, order does not. Every operation returns a new bag,
/// and clones share their structure, so keeping old versions around is cheap.
///
/// # Example
/// ```
/// use tchu::bag::SortedBag;
/// use tchu::card::Card;
///
/// let hand = SortedBag::of(2, Card::Red).with_added(1, Card::Locomotive);
/// assert_eq!(hand.len(), 3);
/// assert_eq!(hand.count_of(&Card::Red), 2);
/// assert!(hand.contains_all(&SortedBag::of(1, Card::Locomotive)));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SortedBag<T: Ord + Clone> {
    counts: OrdMap<T, usize>,
    size: usize,
}

impl<T: Ord + Clone> SortedBag<T> {
    /// The empty bag.
    pub fn new() -> Self {
        Self {
            counts: OrdMap::new(),
            size: 0,
        }
    }

    /// A bag holding `count` copies of `item`.
    pub fn of(count: usize, item: T) -> Self {
        Self::new().with_added(count, item)
    }

    /// Total number of elements, counting repetitions.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// How many copies of `item` the bag holds.
    pub fn count_of(&self, item: &T) -> usize {
        self.counts.get(item).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.count_of(item) > 0
    }

    /// Whether `other` is a sub-multiset of this bag.
    pub fn contains_all(&self, other: &Self) -> bool {
        other
            .counts
            .iter()
            .all(|(item, count)| self.count_of(item) >= *count)
    }

    /// Returns a new bag with `count` more copies of `item`.
    pub fn with_added(&self, count: usize, item: T) -> Self {
        if count == 0 {
            return self.clone();
        }

        let mut counts = self.counts.clone();
        let current = counts.get(&item).copied().unwrap_or(0);
        counts.insert(item, current + count);

        Self {
            counts,
            size: self.size + count,
        }
    }

    /// Multiset union: multiplicities are added.
    pub fn union(&self, other: &Self) -> Self {
        other
            .counts
            .iter()
            .fold(self.clone(), |bag, (item, count)| {
                bag.with_added(*count, item.clone())
            })
    }

    /// Multiset difference: multiplicities are subtracted, bottoming out at zero.
    pub fn difference(&self, other: &Self) -> Self {
        let mut counts = self.counts.clone();
        let mut size = self.size;

        for (item, count) in other.counts.iter() {
            let current = match counts.get(item) {
                Some(current) => *current,
                None => continue,
            };

            let removed = current.min(*count);
            size -= removed;
            if removed == current {
                counts.remove(item);
            } else {
                counts.insert(item.clone(), current - removed);
            }
        }

        Self { counts, size }
    }

    /// All elements in ascending order, each repeated according to its multiplicity.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.counts
            .iter()
            .flat_map(|(item, count)| repeat(item).take(*count))
    }

    /// Distinct elements in ascending order.
    pub fn distinct(&self) -> impl Iterator<Item = &T> + '_ {
        self.counts.keys()
    }

    /// Number of distinct elements.
    #[inline]
    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }

    /// The element at position `index` of the sorted sequence, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Every distinct sub-multiset holding exactly `size` elements.
    ///
    /// Subsets are generated by taking as many copies of the smallest elements
    /// as possible first, so the result is deterministic.
    ///
    /// # Example
    /// ```
    /// use tchu::bag::SortedBag;
    ///
    /// let bag = SortedBag::of(2, 'a').with_added(1, 'b');
    /// let subsets = bag.subsets_of_size(2);
    ///
    /// assert_eq!(subsets.len(), 2);
    /// assert_eq!(subsets[0], SortedBag::of(2, 'a'));
    /// assert_eq!(subsets[1], SortedBag::of(1, 'a').with_added(1, 'b'));
    /// ```
    pub fn subsets_of_size(&self, size: usize) -> Vec<Self> {
        let mut subsets = Vec::new();
        if size > self.size {
            return subsets;
        }

        let entries: Vec<(&T, usize)> = self
            .counts
            .iter()
            .map(|(item, count)| (item, *count))
            .collect();
        Self::collect_subsets(&entries, size, Self::new(), &mut subsets);

        subsets
    }

    fn collect_subsets(
        entries: &[(&T, usize)],
        remaining: usize,
        current: Self,
        subsets: &mut Vec<Self>,
    ) {
        if remaining == 0 {
            subsets.push(current);
            return;
        }

        let ((item, count), rest) = match entries.split_first() {
            Some(split) => split,
            None => return,
        };

        let available_after: usize = rest.iter().map(|(_, count)| count).sum();
        for taken in (0..=(*count).min(remaining)).rev() {
            if available_after < remaining - taken {
                break;
            }

            Self::collect_subsets(
                rest,
                remaining - taken,
                current.with_added(taken, (*item).clone()),
                subsets,
            );
        }
    }
}

impl<T: Ord + Clone> Default for SortedBag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> FromIterator<T> for SortedBag<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |bag, item| bag.with_added(1, item))
    }
}

impl<T: Ord + Clone + fmt::Debug> fmt::Debug for SortedBag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// Bags travel as a flat, sorted sequence of elements so that any element type
// serializes, including those that can't be map keys in JSON.
impl<T: Ord + Clone + Serialize> Serialize for SortedBag<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Ord + Clone + Deserialize<'de>> Deserialize<'de> for SortedBag<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(|items| items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bag(items: &str) -> SortedBag<char> {
        items.chars().collect()
    }

    #[test]
    fn empty_bag() {
        let empty = SortedBag::<char>::new();

        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.iter().count(), 0);
        assert_eq!(empty, SortedBag::default());
    }

    #[test]
    fn bag_iterates_in_sorted_order() {
        let b = bag("cabca");

        assert_eq!(b.len(), 5);
        assert_eq!(b.to_vec(), vec!['a', 'a', 'b', 'c', 'c']);
        assert_eq!(b.distinct().copied().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
        assert_eq!(b.distinct_count(), 3);
        assert_eq!(b.get(2), Some(&'b'));
        assert_eq!(b.get(5), None);
    }

    #[test]
    fn bag_equality_ignores_insertion_order() {
        assert_eq!(bag("abca"), bag("aacb"));
        assert_ne!(bag("abc"), bag("abcc"));
    }

    #[test]
    fn bag_of_zero_is_empty() {
        assert!(SortedBag::of(0, 'a').is_empty());
    }

    #[test]
    fn bag_union_adds_multiplicities() {
        let union = bag("aab").union(&bag("abc"));

        assert_eq!(union, bag("aaabbc"));
        assert_eq!(union.count_of(&'a'), 3);
    }

    #[test]
    fn bag_difference_subtracts_multiplicities() {
        assert_eq!(bag("aaabc").difference(&bag("abd")), bag("aac"));
        assert_eq!(bag("ab").difference(&bag("aabb")), SortedBag::new());
        assert_eq!(bag("ab").difference(&bag("aabb")).len(), 0);
    }

    #[test]
    fn bag_contains_all() {
        let b = bag("aabc");

        assert!(b.contains_all(&bag("ab")));
        assert!(b.contains_all(&bag("aa")));
        assert!(b.contains_all(&SortedBag::new()));
        assert!(!b.contains_all(&bag("aaa")));
        assert!(!b.contains_all(&bag("d")));
    }

    #[test]
    fn bag_subsets_of_size() {
        let subsets = bag("aabb").subsets_of_size(2);

        assert_eq!(subsets, vec![bag("aa"), bag("ab"), bag("bb")]);
    }

    #[test]
    fn bag_subsets_edge_cases() {
        assert_eq!(bag("ab").subsets_of_size(0), vec![SortedBag::new()]);
        assert!(bag("ab").subsets_of_size(3).is_empty());
        assert_eq!(bag("abc").subsets_of_size(3), vec![bag("abc")]);
    }

    #[test]
    fn bag_to_json() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&bag("bab"))?, r#"["a","b","b"]"#);
        assert_eq!(serde_json::from_str::<SortedBag<char>>(r#"["b","a"]"#)?, bag("ab"));

        Ok(())
    }
}
