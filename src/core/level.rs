//! Index arithmetic for the implicit min-max tree.
//!
//! The tree is 1-indexed: the root is node 1, node `i` has children `2i` and
//! `2i + 1`, and its depth is `floor(log2(i))`. Even depths are min levels,
//! odd depths are max levels. Storage is a 0-indexed `Vec`, so callers convert
//! with [`slot`] at the storage boundary and keep every comparison in node
//! space.
//!
//! ```text
//! depth 0 (min)            1
//! depth 1 (max)       2         3
//! depth 2 (min)     4   5     6   7
//! depth 3 (max)    8 9 10 11 12 13 14 15
//! ```

/// Node number of the root.
pub const ROOT: usize = 1;

/// Converts a 1-based node number into a 0-based storage slot.
#[inline]
pub const fn slot(node: usize) -> usize {
    debug_assert!(node >= ROOT);
    node - 1
}

/// Depth of `node` in the tree (`floor(log2(node))`).
#[inline]
pub const fn depth(node: usize) -> u32 {
    debug_assert!(node >= ROOT);
    usize::BITS - 1 - node.leading_zeros()
}

/// Returns `true` if `node` sits on a min level.
#[inline]
pub const fn is_min_level(node: usize) -> bool {
    depth(node) % 2 == 0
}

/// Parent of `node`. The root has no parent; callers must check first.
#[inline]
pub const fn parent(node: usize) -> usize {
    node / 2
}

/// Grandparent of `node`. Valid only for nodes at depth 2 or deeper.
#[inline]
pub const fn grandparent(node: usize) -> usize {
    node / 4
}

/// Left child of `node`.
#[inline]
pub const fn first_child(node: usize) -> usize {
    node * 2
}

/// Right child of `node`.
#[inline]
pub const fn second_child(node: usize) -> usize {
    node * 2 + 1
}

/// Returns `true` if `descendant` is a grandchild of `ancestor`.
#[inline]
pub const fn is_grandchild(ancestor: usize, descendant: usize) -> bool {
    descendant >= ROOT * 4 && grandparent(descendant) == ancestor
}

/// Children and grandchildren of `node` that exist in a tree of `len` nodes,
/// in left-to-right order.
///
/// The iterator yields at most six nodes: two children followed by up to four
/// grandchildren.
#[inline]
pub fn descendants(node: usize, len: usize) -> impl Iterator<Item = usize> {
    let children = first_child(node)..=second_child(node);
    let grandchildren = first_child(first_child(node))..=second_child(second_child(node));
    children.chain(grandchildren).take_while(move |&n| n <= len)
}
