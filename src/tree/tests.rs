use super::*;
use quickcheck_macros::quickcheck;
use std::{collections::BTreeMap, fmt::Write, format, prelude::v1::*};

impl<T: Ord + fmt::Debug> RbTree<T> {
    /// Lift `node`'s right child into `node`'s position.
    unsafe fn rotate_left(&mut self, node: NodePtr<T>) {
        self.rotate(node, false);
    }

    /// Lift `node`'s left child into `node`'s position.
    unsafe fn rotate_right(&mut self, node: NodePtr<T>) {
        self.rotate(node, true);
    }

    fn dump_structure(&self) -> String {
        let mut out = String::new();
        unsafe { Self::dump_node(self.root, 1, &mut out).unwrap() };
        out
    }

    unsafe fn dump_node(
        p_node: Option<NodePtr<T>>,
        level: usize,
        out: &mut impl Write,
    ) -> fmt::Result {
        for _ in 0..level {
            write!(out, "  ")?;
        }
        if let Some(p_node) = p_node {
            let node = p_node.as_ref();
            writeln!(out, "{:?} {:?}", node.element, node.color)?;
            for &child in node.children.iter() {
                Self::dump_node(child, level + 1, out)?;
            }
        } else {
            writeln!(out, "nil")?;
        }
        Ok(())
    }

    /// Check every structural and coloring invariant. Returns the black
    /// height of the tree.
    fn validate(&self) -> usize {
        let mut count = 0;
        let black_height = match self.root {
            Some(root) => unsafe {
                assert_eq!(root.as_ref().parent, None, "root has a parent");
                assert_eq!(root.as_ref().color, Color::Black, "root must be black");
                Self::validate_node(root, &mut count)
            },
            None => 0,
        };
        assert_eq!(count, self.len, "len mismatch");

        let elements: Vec<_> = self.iter().collect();
        assert!(
            elements.windows(2).all(|w| w[0] <= w[1]),
            "in-order walk is not sorted: {:?}",
            elements
        );
        assert_eq!(self.iter().len(), self.len);

        black_height
    }

    /// Returns the black height of the subtree, excluding `p_node` itself.
    unsafe fn validate_node(p_node: NodePtr<T>, count: &mut usize) -> usize {
        let node = p_node.as_ref();
        *count += 1;

        let mut heights = [0; 2];
        for (side, &child) in node.children.iter().enumerate() {
            let Some(p_child) = child else { continue };
            let child = p_child.as_ref();

            assert_eq!(
                child.parent,
                Some(p_node),
                "{:?}'s parent link does not point to {:?}",
                child.element,
                node.element
            );

            if node.color == Color::Red {
                assert_eq!(
                    child.color,
                    Color::Black,
                    "a red node must not have a red child",
                );
            }

            if side == 0 {
                assert!(child.element <= node.element, "left child is greater");
            } else {
                assert!(child.element >= node.element, "right child is less");
            }

            heights[side] = Self::validate_node(p_child, count)
                + (child.color == Color::Black) as usize;
        }

        assert_eq!(
            heights[0], heights[1],
            "black height mismatch under {:?}",
            node.element
        );
        heights[0]
    }

    fn root_entry(&self) -> Option<(&T, Color)> {
        self.root
            .map(|root| unsafe { (&root.as_ref().element, root.as_ref().color) })
    }

    fn child_entry(&self, path: &[IsRightChild]) -> Option<(&T, Color)> {
        let mut cursor = self.root;
        for &side in path {
            cursor = unsafe { cursor?.as_ref().children[side as usize] };
        }
        cursor.map(|node| unsafe { (&(*node.as_ptr()).element, (*node.as_ptr()).color) })
    }
}

#[test]
fn single_key() {
    let mut tree = RbTree::new();
    tree.insert(5);
    tree.validate();

    assert_eq!(tree.root_entry(), Some((&5, Color::Black)));
    assert_eq!(tree.child_entry(&[false]), None);
    assert_eq!(tree.child_entry(&[true]), None);
    assert_eq!(tree.len(), 1);
}

#[test]
fn ascending_three_rotate() {
    let tree: RbTree<_> = [10, 20, 30].into_iter().collect();
    log::trace!("Tree = \n{}", tree.dump_structure());
    tree.validate();

    assert_eq!(tree.root_entry(), Some((&20, Color::Black)));
    assert_eq!(tree.child_entry(&[false]), Some((&10, Color::Red)));
    assert_eq!(tree.child_entry(&[true]), Some((&30, Color::Red)));
}

#[test]
fn zig_zag_rotate() {
    let tree: RbTree<_> = [30, 10, 20].into_iter().collect();
    tree.validate();

    assert_eq!(tree.root_entry(), Some((&20, Color::Black)));
    assert_eq!(tree.child_entry(&[false]), Some((&10, Color::Red)));
    assert_eq!(tree.child_entry(&[true]), Some((&30, Color::Red)));
}

#[test]
fn red_uncle_recolors() {
    let mut tree: RbTree<_> = [20, 10, 30].into_iter().collect();
    tree.insert(5);
    tree.validate();

    assert_eq!(tree.root_entry(), Some((&20, Color::Black)));
    assert_eq!(tree.child_entry(&[false]), Some((&10, Color::Black)));
    assert_eq!(tree.child_entry(&[true]), Some((&30, Color::Black)));
    assert_eq!(tree.child_entry(&[false, false]), Some((&5, Color::Red)));
}

#[test]
fn remove_inner_key() {
    let mut tree: RbTree<_> = [10, 20, 30, 40, 50, 60, 70].into_iter().collect();
    tree.validate();

    assert!(tree.remove(&20));
    log::trace!("Tree = \n{}", tree.dump_structure());
    tree.validate();

    assert!(!tree.contains(&20));
    assert!(tree.contains(&40));
    assert_eq!(
        tree.iter().copied().collect::<Vec<_>>(),
        [10, 30, 40, 50, 60, 70]
    );
}

#[test]
fn remove_two_child_takes_successor() {
    let mut tree: RbTree<_> = [20, 10, 30].into_iter().collect();
    let root = tree.root.unwrap();

    assert_eq!(tree.take(&20), Some(20));
    tree.validate();

    // The root node survives and now holds the successor's key
    assert_eq!(tree.root, Some(root));
    assert_eq!(tree.root_entry(), Some((&30, Color::Black)));
    assert_eq!(tree.child_entry(&[false]), Some((&10, Color::Red)));
}

#[test]
fn remove_black_leaf_rebalances() {
    // Inserting 5 hits the red-uncle case, which paints 10 and 30 black
    let mut tree: RbTree<_> = [20, 10, 30, 5].into_iter().collect();
    assert!(tree.remove(&5));
    assert_eq!(tree.child_entry(&[false]), Some((&10, Color::Black)));

    // Removing the black leaf `10` must not unbalance the tree
    assert!(tree.remove(&10));
    tree.validate();
    assert_eq!(tree.root_entry(), Some((&20, Color::Black)));
    assert_eq!(tree.child_entry(&[true]), Some((&30, Color::Red)));
}

#[test]
fn remove_absent_is_noop() {
    let mut tree: RbTree<_> = [10, 20, 30, 40].into_iter().collect();
    let before = tree.dump_structure();

    assert!(!tree.remove(&25));
    assert_eq!(tree.take(&0), None);

    assert_eq!(tree.dump_structure(), before);
    assert_eq!(tree.len(), 4);

    let mut empty = RbTree::<i32>::new();
    assert!(!empty.remove(&1));
    assert!(empty.is_empty());
}

#[test]
fn remove_until_empty() {
    let mut tree: RbTree<_> = (0..64).collect();
    for i in (0..64).rev().step_by(3).chain((0..64).step_by(2)) {
        tree.remove(&i);
        tree.validate();
    }
    for i in 0..64 {
        tree.remove(&i);
        tree.validate();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.first(), None);
}

#[test]
fn duplicates_are_kept() {
    let mut tree: RbTree<_> = [7, 3, 7, 7, 1, 3].into_iter().collect();
    tree.validate();
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 3, 7, 7, 7]);

    assert!(tree.remove(&7));
    tree.validate();
    assert!(tree.contains(&7));
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 3, 7, 7]);
}

#[test]
fn first_last_get() {
    let tree: RbTree<_> = [42, 8, 15, 16, 23, 4].into_iter().collect();
    assert_eq!(tree.first(), Some(&4));
    assert_eq!(tree.last(), Some(&42));
    assert_eq!(tree.get(&15), Some(&15));
    assert_eq!(tree.get(&14), None);
    assert_eq!(format!("{:?}", tree), "{4, 8, 15, 16, 23, 42}");
}

#[test]
fn rotate_round_trip() {
    let mut tree: RbTree<_> = (1..=15).collect();
    tree.validate();
    let before = tree.dump_structure();

    unsafe {
        let pivot = tree.root.unwrap();
        tree.rotate_left(pivot);
        assert_eq!(pivot.as_ref().parent, tree.root);
        tree.rotate_right(tree.root.unwrap());
        assert_eq!(tree.root, Some(pivot));
    }
    assert_eq!(tree.dump_structure(), before);
    tree.validate();

    unsafe {
        let pivot = tree.root.unwrap().as_ref().children[1].unwrap();
        tree.rotate_right(pivot);
        let lifted = pivot.as_ref().parent.unwrap();
        tree.rotate_left(lifted);
        assert_eq!(tree.root.unwrap().as_ref().children[1], Some(pivot));
    }
    assert_eq!(tree.dump_structure(), before);
    tree.validate();
}

#[test]
fn traverse_right_first() {
    let tree: RbTree<_> = [10, 20, 30].into_iter().collect();
    let visits: Vec<_> = tree
        .traverse()
        .map(|v| (*v.value, v.color, v.depth))
        .collect();
    assert_eq!(
        visits,
        [
            (30, Color::Red, 1),
            (20, Color::Black, 0),
            (10, Color::Red, 1)
        ]
    );

    // Restartable
    assert_eq!(tree.traverse().count(), 3);
    assert_eq!(RbTree::<u8>::new().traverse().next(), None);
}

#[test]
fn dump_layout() {
    let tree: RbTree<_> = [10, 20, 30].into_iter().collect();
    assert_eq!(
        tree.dump(4).to_string(),
        "    30 (R)\n\n20 (B)\n\n    10 (R)\n\n"
    );
    assert_eq!(RbTree::<i32>::new().dump(4).to_string(), "");
}

#[test]
fn drop_releases_owned_keys() {
    use std::rc::Rc;

    let key = Rc::new(());
    {
        let mut tree = RbTree::new();
        for i in 0..32 {
            tree.insert((i % 5, Rc::clone(&key)));
        }
        tree.remove(&(3, Rc::clone(&key)));
        assert_eq!(Rc::strong_count(&key), 32);
    }
    assert_eq!(Rc::strong_count(&key), 1);
}

#[quickcheck]
fn qc_insert_remove(cmds: Vec<u8>) {
    let mut cmds = cmds.into_iter();
    let mut tree = RbTree::new();
    let mut expected = BTreeMap::<u8, usize>::new();

    log::info!("Command: {:?}", cmds);

    (|| -> Option<()> {
        while let Some(cmd) = cmds.next() {
            let key = cmds.next()? % 64;
            match cmd % 3 {
                0 => {
                    log::debug!("Remove {:?}", key);
                    let was_present = expected.contains_key(&key);
                    assert_eq!(tree.remove(&key), was_present);
                    if was_present {
                        let count = expected.get_mut(&key).unwrap();
                        *count -= 1;
                        if *count == 0 {
                            expected.remove(&key);
                        }
                    }
                }
                _ => {
                    log::debug!("Insert {:?}", key);
                    tree.insert(key);
                    *expected.entry(key).or_insert(0) += 1;
                }
            }

            log::trace!("Tree = \n{}", tree.dump_structure());

            // Validate the tree after each command
            tree.validate();

            // Check the sequence represented
            let expected_elements: Vec<u8> = expected
                .iter()
                .flat_map(|(&key, &count)| std::iter::repeat(key).take(count))
                .collect();
            let tree_elements: Vec<u8> = tree.iter().copied().collect();
            assert_eq!(tree_elements, expected_elements);

            let mut reversed: Vec<u8> = tree.traverse().map(|v| *v.value).collect();
            reversed.reverse();
            assert_eq!(reversed, expected_elements);

            for probe in 0..64 {
                assert_eq!(tree.contains(&probe), expected.contains_key(&probe));
            }
        }

        Some(())
    })();
}

#[quickcheck]
fn qc_distinct_keys_logarithmic_height(keys: Vec<u16>) {
    let mut tree = RbTree::new();
    for &key in keys.iter() {
        if !tree.contains(&key) {
            tree.insert(key);
        }
    }
    let black_height = tree.validate();

    // A red-black tree with `n` keys is at most `2 * log2(n + 1)` high
    let height = tree.traverse().map(|v| v.depth + 1).max().unwrap_or(0);
    let bound = 2 * (usize::BITS - tree.len().leading_zeros()) as usize;
    assert!(height <= bound, "height {} exceeds {}", height, bound);
    assert!(black_height <= height);
}
