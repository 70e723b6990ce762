//! Read-only walks over [`RbTree`].
use alloc::vec::Vec;
use core::{fmt, iter::FusedIterator, marker::PhantomData};

use super::{Color, NodePtr, RbTree};

/// An ascending iterator over the keys of [`RbTree`].
///
/// Created by [`RbTree::iter`].
pub struct Iter<'a, T> {
    /// The nodes whose left subtrees were already visited
    stack: Vec<NodePtr<T>>,
    remaining: usize,
    _marker: PhantomData<&'a RbTree<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(tree: &'a RbTree<T>) -> Self {
        let mut this = Self {
            stack: Vec::new(),
            remaining: tree.len,
            _marker: PhantomData,
        };
        this.descend(tree.root);
        this
    }

    fn descend(&mut self, mut cursor: Option<NodePtr<T>>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            // Safety: The nodes are valid while the tree is borrowed
            cursor = unsafe { node.as_ref().children[0] };
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Safety: The nodes are valid while the tree is borrowed
        let node = unsafe { &*node.as_ptr() };
        self.descend(node.children[1]);
        self.remaining -= 1;
        Some(&node.element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// A node reported by [`Traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit<'a, T> {
    pub value: &'a T,
    pub color: Color,
    /// The distance from the root. The root is at depth zero.
    pub depth: usize,
}

/// A reverse in-order walk over [`RbTree`] (right subtree, node, left
/// subtree), reporting each node's color and depth.
///
/// Created by [`RbTree::traverse`].
pub struct Traverse<'a, T> {
    stack: Vec<(NodePtr<T>, usize)>,
    _marker: PhantomData<&'a RbTree<T>>,
}

impl<'a, T> Traverse<'a, T> {
    pub(super) fn new(tree: &'a RbTree<T>) -> Self {
        let mut this = Self {
            stack: Vec::new(),
            _marker: PhantomData,
        };
        this.descend(tree.root, 0);
        this
    }

    fn descend(&mut self, mut cursor: Option<NodePtr<T>>, mut depth: usize) {
        while let Some(node) = cursor {
            self.stack.push((node, depth));
            // Safety: The nodes are valid while the tree is borrowed
            cursor = unsafe { node.as_ref().children[1] };
            depth += 1;
        }
    }
}

impl<'a, T> Iterator for Traverse<'a, T> {
    type Item = Visit<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        // Safety: The nodes are valid while the tree is borrowed
        let node = unsafe { &*node.as_ptr() };
        self.descend(node.children[0], depth + 1);
        Some(Visit {
            value: &node.element,
            color: node.color,
            depth,
        })
    }
}

impl<T> FusedIterator for Traverse<'_, T> {}

/// Renders [`RbTree`] sideways for a console.
///
/// The rightmost key comes first. Every node takes one line of the form
/// `{value} (R)` or `{value} (B)`, indented by its depth times the
/// configured width and followed by a blank line.
///
/// Created by [`RbTree::dump`].
pub struct Dump<'a, T> {
    tree: &'a RbTree<T>,
    indent: usize,
}

impl<'a, T> Dump<'a, T> {
    pub(super) fn new(tree: &'a RbTree<T>, indent: usize) -> Self {
        Self { tree, indent }
    }
}

impl<T: fmt::Display> fmt::Display for Dump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for visit in self.tree.traverse() {
            writeln!(
                f,
                "{:width$}{} ({})",
                "",
                visit.value,
                visit.color.abbrev(),
                width = visit.depth * self.indent
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}
