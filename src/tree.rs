//! An owning [red-black][1] [binary search tree][2].
//!
//! [1]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
//! [2]: https://en.wikipedia.org/wiki/Binary_search_tree
//!
//! Every node is boxed separately and linked to its children and parent by
//! raw pointers. The children are owning links; the parent link is only used
//! to walk upwards during rebalancing. [`RbTree`] owns all nodes and releases
//! them when they are removed or when the tree is dropped.
#![allow(unsafe_op_in_unsafe_fn)]
use alloc::{boxed::Box, vec::Vec};
use core::{cmp::Ordering, fmt, marker::PhantomData, mem::swap, ptr::NonNull};

mod iter;
#[cfg(test)]
mod tests;

pub use self::iter::{Dump, Iter, Traverse, Visit};

/// The color of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
}

impl Color {
    /// The single-letter form used by [`Dump`].
    #[inline]
    pub const fn abbrev(self) -> char {
        match self {
            Self::Black => 'B',
            Self::Red => 'R',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Black => "black",
            Self::Red => "red",
        })
    }
}

type IsRightChild = bool;

struct Node<T> {
    children: [Option<NonNull<Self>>; 2],
    parent: Option<NonNull<Self>>,
    color: Color,
    element: T,
}

type NodePtr<T> = NonNull<Node<T>>;

impl<T> Node<T> {
    /// Allocate a detached red node.
    fn alloc(element: T) -> NodePtr<T> {
        let node = Box::new(Self {
            children: [None, None],
            parent: None,
            color: Color::Red,
            element,
        });
        NonNull::from(Box::leak(node))
    }

    /// Find the minimum (leftmost) node in the subtree rooted by `this`.
    ///
    /// # Safety
    ///
    /// `this` and all of its descendants must be valid.
    #[inline]
    unsafe fn min(mut this: NodePtr<T>) -> NodePtr<T> {
        while let Some(child) = this.as_ref().children[0] {
            this = child;
        }
        this
    }

    /// Find the maximum (rightmost) node in the subtree rooted by `this`.
    ///
    /// # Safety
    ///
    /// `this` and all of its descendants must be valid.
    #[inline]
    unsafe fn max(mut this: NodePtr<T>) -> NodePtr<T> {
        while let Some(child) = this.as_ref().children[1] {
            this = child;
        }
        this
    }
}

/// Get the color of a possibly-nil node. A nil node is black.
#[inline]
unsafe fn color_of<T>(node: Option<NodePtr<T>>) -> Color {
    node.map_or(Color::Black, |n| n.as_ref().color)
}

/// Get the side on which `child` hangs from `parent`.
#[inline]
unsafe fn side_of<T>(parent: NodePtr<T>, child: NodePtr<T>) -> IsRightChild {
    debug_assert!(parent.as_ref().children.contains(&Some(child)));
    parent.as_ref().children[1] == Some(child)
}

/// A red-black tree holding a multiset of keys.
///
/// Keys that compare equal are all retained. A new key is placed after the
/// keys equal to it, so duplicates are kept in insertion order.
pub struct RbTree<T> {
    root: Option<NodePtr<T>>,
    len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

// Safety: The tree exclusively owns its nodes, like `Box<T>`
unsafe impl<T: Send> Send for RbTree<T> {}
unsafe impl<T: Sync> Sync for RbTree<T> {}

impl<T> RbTree<T> {
    /// Construct an empty tree.
    #[inline]
    pub const fn new() -> Self {
        Self {
            root: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Get the number of keys in the tree, counting duplicates.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove all keys.
    pub fn clear(&mut self) {
        let mut pending: Vec<NodePtr<T>> = self.root.take().into_iter().collect();
        while let Some(node) = pending.pop() {
            // Safety: Every node was allocated by `Node::alloc` and is reachable
            // from `root` exactly once
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            pending.extend(node.children.iter().flatten());
        }
        self.len = 0;
    }

    /// Get the minimum key.
    pub fn first(&self) -> Option<&T> {
        // Safety: The nodes are valid while `self` is borrowed
        self.root
            .map(|root| unsafe { &Node::min(root).as_ref().element })
    }

    /// Get the maximum key.
    pub fn last(&self) -> Option<&T> {
        // Safety: The nodes are valid while `self` is borrowed
        self.root
            .map(|root| unsafe { &Node::max(root).as_ref().element })
    }

    /// Iterate over the keys in ascending order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Walk the tree in the order it is laid out on a console: right subtree
    /// first, then the node, then the left subtree. Each step reports the
    /// node's depth (the root is at depth zero).
    ///
    /// The walk has no effect on the tree; call this again to restart it.
    #[inline]
    pub fn traverse(&self) -> Traverse<'_, T> {
        Traverse::new(self)
    }

    /// Render the tree sideways, the root on the left. Each level is indented
    /// by `indent` spaces.
    #[inline]
    pub fn dump(&self, indent: usize) -> Dump<'_, T> {
        Dump::new(self, indent)
    }

    /// Get the slot that stores `parent`'s child on `side`, or the root slot
    /// if `parent` is `None`.
    #[inline]
    unsafe fn child_slot(
        &mut self,
        parent: Option<NodePtr<T>>,
        side: IsRightChild,
    ) -> &mut Option<NodePtr<T>> {
        if let Some(mut parent) = parent {
            &mut parent.as_mut().children[side as usize]
        } else {
            &mut self.root
        }
    }

    /// Rotate a node. `dir` specifies `node`'s position after rotation.
    ///
    /// # Safety
    ///
    /// `node` must be part of `self` and have a child on the side opposite to
    /// `dir`.
    unsafe fn rotate(&mut self, mut node: NodePtr<T>, dir: IsRightChild) {
        let idir = (!dir) as usize;
        let dir = dir as usize;

        //          node            new_root
        //          /  \            /  \
        //         /    \          /    \
        //  new_root    y   ==>   x     node
        //    /  \                      /  \
        //   x  mid                    mid  y

        let mut new_root = node.as_ref().children[idir].expect("post-rotation root does not exist");
        let mid = new_root.as_ref().children[dir];
        node.as_mut().children[idir] = mid;
        new_root.as_mut().children[dir] = Some(node);

        let parent = node.as_ref().parent;
        new_root.as_mut().parent = parent;
        node.as_mut().parent = Some(new_root);
        if let Some(mut mid) = mid {
            mid.as_mut().parent = Some(node);
        }

        // Update the subtree's parent's child pointer
        let side = match parent {
            Some(parent) => side_of(parent, node),
            None => false,
        };
        let child_cell = self.child_slot(parent, side);
        debug_assert_eq!(*child_cell, Some(node));
        *child_cell = Some(new_root);
    }

    /// Restore the color invariant after `node` (red) was attached as a leaf.
    unsafe fn insert_fixup(&mut self, mut node: NodePtr<T>) {
        loop {
            debug_assert_eq!(node.as_ref().color, Color::Red);

            let Some(mut parent) = node.as_ref().parent else {
                // `node` is the root. Painting it black increases the black
                // height of every path by one.
                node.as_mut().color = Color::Black;
                return;
            };

            // Color invariant fulfilled?
            if parent.as_ref().color == Color::Black {
                return;
            }

            let Some(mut grandparent) = parent.as_ref().parent else {
                // `parent` is a red root. Switch its color.
                parent.as_mut().color = Color::Black;
                return;
            };

            // Due to the color invariant, `grandparent` must be black.
            debug_assert_eq!(grandparent.as_ref().color, Color::Black);

            let parent_side = side_of(grandparent, parent);
            let uncle = grandparent.as_ref().children[(!parent_side) as usize];
            if let Some(mut uncle) = uncle.filter(|u| u.as_ref().color == Color::Red) {
                // Both `parent` and `uncle` are red. Repaint them to black
                // and `grandparent` to red. This doesn't change
                // `grandparent`'s subtree's black height, but `grandparent`
                // might now violate the color invariant.
                parent.as_mut().color = Color::Black;
                uncle.as_mut().color = Color::Black;
                grandparent.as_mut().color = Color::Red;
                node = grandparent;
                continue;
            }

            // `parent` is red, but `uncle` is black. If `node` is an inner
            // grandchild, straighten the line first.
            let mut node_side = side_of(parent, node);
            if node_side != parent_side {
                self.rotate(parent, !node_side);

                // The rotation flips the relationship between `node` and
                // `parent`.
                swap(&mut parent, &mut node);
                node_side = !node_side;
                debug_assert_eq!(parent.as_ref().parent, Some(grandparent));
            }

            // Push `grandparent` to `uncle`'s side, making `parent` the
            // parent of `node` and `grandparent`, and swap their colors.
            self.rotate(grandparent, !node_side);
            parent.as_mut().color = Color::Black;
            grandparent.as_mut().color = Color::Red;
            return;
        }
    }

    /// Detach `node` from the tree and rebalance it.
    ///
    /// If `node` has two children, its key is exchanged with its in-order
    /// successor's, and the successor's node is detached instead. The
    /// returned node holds the key that `node` held on entry.
    ///
    /// # Safety
    ///
    /// `node` must be part of `self`.
    unsafe fn unlink(&mut self, mut node: NodePtr<T>) -> Box<Node<T>> {
        let mut target = node;
        if let [Some(_), Some(right)] = node.as_ref().children {
            target = Node::min(right);
            swap(&mut node.as_mut().element, &mut target.as_mut().element);
        }

        // `target` has at most one child. Splice it out.
        let [left, right] = target.as_ref().children;
        debug_assert!(left.is_none() || right.is_none());
        let child = left.or(right);
        let parent = target.as_ref().parent;
        let side = match parent {
            Some(parent) => side_of(parent, target),
            None => false,
        };
        if let Some(mut child) = child {
            child.as_mut().parent = parent;
        }
        *self.child_slot(parent, side) = child;

        if target.as_ref().color == Color::Black {
            // Every path through `child`'s position now has one less black
            // node than the rest of the tree. This includes the case where
            // `child` is nil.
            self.remove_fixup(child, parent, side);
        }

        Box::from_raw(target.as_ptr())
    }

    /// Restore the black height invariant after a black node was removed
    /// from `parent`'s `node_side`. `node` is what took its place and may be
    /// nil.
    unsafe fn remove_fixup(
        &mut self,
        mut node: Option<NodePtr<T>>,
        mut parent: Option<NodePtr<T>>,
        mut node_side: IsRightChild,
    ) {
        while let Some(mut p) = parent {
            if color_of(node) == Color::Red {
                break;
            }

            //         p
            //        / \
            //       /   \
            //    node  sibling
            //           /   \
            //          /     \
            //   near_nephew  far_nephew
            //
            let near = node_side as usize;
            let far = (!node_side) as usize;

            // `node` is one black short, so `sibling` must exist
            let mut sibling = p.as_ref().children[far].expect("doubly-black node has no sibling");

            if sibling.as_ref().color == Color::Red {
                // Move `p` into `node`'s position so that `node` gets a black
                // sibling (the former near nephew).
                sibling.as_mut().color = Color::Black;
                p.as_mut().color = Color::Red;
                self.rotate(p, node_side);
                sibling = p.as_ref().children[far].expect("doubly-black node has no sibling");
            }

            let near_nephew = sibling.as_ref().children[near];
            let far_nephew = sibling.as_ref().children[far];

            if color_of(near_nephew) == Color::Black && color_of(far_nephew) == Color::Black {
                // Repaint `sibling` to red. This rectifies the black height
                // difference between `node` and `sibling`, but `p` as a whole
                // is now one black short.
                sibling.as_mut().color = Color::Red;
                node = Some(p);
                parent = p.as_ref().parent;
                if let Some(grandparent) = parent {
                    node_side = side_of(grandparent, p);
                }
                continue;
            }

            if color_of(far_nephew) == Color::Black {
                // Move the (red) near nephew to `sibling`'s position
                if let Some(mut near_nephew) = near_nephew {
                    near_nephew.as_mut().color = Color::Black;
                }
                sibling.as_mut().color = Color::Red;
                self.rotate(sibling, !node_side);
                sibling = p.as_ref().children[far].expect("doubly-black node has no sibling");
            }

            // The far nephew is red. Move `sibling` to `p`'s position; `p`
            // adopts the near nephew and gives `node` its missing black.
            sibling.as_mut().color = p.as_ref().color;
            p.as_mut().color = Color::Black;
            if let Some(mut far_nephew) = sibling.as_ref().children[far] {
                far_nephew.as_mut().color = Color::Black;
            }
            self.rotate(p, node_side);
            node = self.root;
            break;
        }

        if let Some(mut node) = node {
            node.as_mut().color = Color::Black;
        }
    }
}

impl<T: Ord> RbTree<T> {
    /// Insert a key.
    ///
    /// If the tree already contains keys equal to `element`, the new one is
    /// placed after them.
    pub fn insert(&mut self, element: T) {
        let new_node = Node::alloc(element);

        // Safety: `new_node` is detached, and all nodes in `self` are valid
        unsafe {
            self.attach(new_node);
            self.insert_fixup(new_node);
        }
        self.len += 1;
    }

    /// Hang `new_node` as a leaf in its binary search tree position.
    unsafe fn attach(&mut self, mut new_node: NodePtr<T>) {
        let Some(mut parent) = self.root else {
            self.root = Some(new_node);
            return;
        };

        loop {
            // Equal keys go right
            let side = new_node.as_ref().element.cmp(&parent.as_ref().element) != Ordering::Less;
            let child_cell = &mut parent.as_mut().children[side as usize];

            if let Some(child) = *child_cell {
                parent = child;
            } else {
                *child_cell = Some(new_node);
                new_node.as_mut().parent = Some(parent);
                return;
            }
        }
    }

    /// Find a node holding a key equal to `value`.
    fn find(&self, value: &T) -> Option<NodePtr<T>> {
        let mut cursor = self.root;
        while let Some(node) = cursor {
            // Safety: The nodes are valid while `self` is borrowed
            let node_ref = unsafe { node.as_ref() };
            cursor = match value.cmp(&node_ref.element) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node_ref.children[0],
                Ordering::Greater => node_ref.children[1],
            };
        }
        None
    }

    /// Check whether the tree contains a key equal to `value`.
    #[doc(alias = "search")]
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Get a reference to a stored key equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        // Safety: The nodes are valid while `self` is borrowed
        self.find(value)
            .map(|node| unsafe { &(*node.as_ptr()).element })
    }

    /// Remove one key equal to `value` and return it. Returns `None` (and
    /// leaves the tree untouched) if there's no such key.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let node = self.find(value)?;

        // Safety: `node` was just found in `self`
        let removed = unsafe { self.unlink(node) };
        self.len -= 1;
        Some(removed.element)
    }

    /// Remove one key equal to `value`. Returns `false` if there's no such
    /// key.
    #[inline]
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }
}

impl<T> Drop for RbTree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for RbTree<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RbTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> Extend<T> for RbTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Ord> FromIterator<T> for RbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a RbTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
