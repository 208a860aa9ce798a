use rank_tree::{Duplicates, Mode, Tree};

use std::collections::HashSet;

use quickcheck_macros::quickcheck;

use crate::Op;

/// Applies a set of operations to a tree and a sorted `Vec`.
/// This way we can ensure that after a random smattering of inserts
/// and removals we have the same keys in the same order.
fn do_ops<K, V>(ops: &[Op<K, V>], tree: &mut Tree<K, V>, model: &mut Vec<K>)
where
    K: Ord + Clone,
    V: Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                tree.insert(k.clone(), v.clone(), Duplicates::Allow).unwrap();
                let pos = model.partition_point(|x| x < k);
                model.insert(pos, k.clone());
            }
            Op::Remove(k) => {
                if let Some(id) = tree.search(k).found() {
                    tree.remove(id).unwrap();
                    if let Ok(pos) = model.binary_search(k) {
                        model.remove(pos);
                    }
                }
            }
        }
    }
}

/// Largest height an AVL tree with `len` nodes can have.
fn avl_height_bound(len: usize) -> usize {
    // Minimum node counts per height follow N(h) = N(h - 1) + N(h - 2) + 1.
    let (mut smaller, mut larger, mut height) = (1usize, 2usize, 1usize);
    if len <= 1 {
        return 0;
    }
    while larger + smaller + 1 <= len {
        let next = larger + smaller + 1;
        smaller = larger;
        larger = next;
        height += 1;
    }
    height
}

fn sorted_and_sized<K: Ord, V>(tree: &Tree<K, V>) -> bool {
    let keys: Vec<_> = tree.keys().collect();
    keys.windows(2).all(|w| w[0] <= w[1])
        && tree.inorder().all(|(id, node)| {
            let counted = tree.inorder_from(id).count();
            node.size() == counted && node.balance().abs() <= 1
        })
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = Vec::new();

    do_ops(&ops, &mut tree, &mut model);
    tree.keys().eq(model.iter()) && sorted_and_sized(&tree)
}

#[quickcheck]
fn avl_height_is_logarithmic(xs: Vec<i16>) -> bool {
    let mut tree = Tree::with_mode(Mode::Avl);
    for x in &xs {
        tree.insert(*x, (), Duplicates::Allow).unwrap();
    }

    tree.height().unwrap_or(0) <= avl_height_bound(tree.len())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x, Duplicates::Reject);
    }

    xs.iter()
        .all(|x| tree.search(x).found().and_then(|id| tree.payload(id)) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x, Duplicates::Reject);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).found().is_none())
}

#[quickcheck]
fn rank_select_inverse(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, (), Duplicates::Allow).unwrap();
    }

    (1..=tree.len()).all(|i| {
        let id = tree.select(i).unwrap();
        tree.rank(id) == Some(i)
    })
}

#[quickcheck]
fn insert_then_delete_restores_keys(xs: Vec<i8>, extra: i8) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, (), Duplicates::Reject);
    }
    let before: Vec<_> = tree.keys().copied().collect();

    match tree.insert(extra, (), Duplicates::Reject) {
        Ok(id) => {
            tree.delete(id).unwrap();
            tree.keys().copied().eq(before)
        }
        Err(_) => before.contains(&extra),
    }
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::with_mode(Mode::Plain);
    for x in &xs {
        let _ = tree.insert(*x, *x, Duplicates::Reject);
    }
    for delete in &deletes {
        if let Some(id) = tree.search(delete).found() {
            tree.remove(id).unwrap();
        }
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| tree.search(x).found().is_none())
        && still_present.iter().all(|x| tree.search(x).found().is_some())
}
