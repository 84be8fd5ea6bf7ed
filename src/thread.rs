//! Rebuilds reply threads from the flat, page-ordered comment list.
//!
//! V2EX has no structural reply links; a reply addresses its parent by
//! writing `@username` in the body. Only backward references resolve: a
//! comment naming an author who posts later in the list stays top-level.
//! Threads are two levels deep; a reply to a reply joins the same top-level
//! comment.

use crate::v2ex::Comment;

/// Groups `comments` into top-level nodes with their replies attached,
/// keeping page order among roots and among siblings.
pub fn build(comments: Vec<Comment>) -> Vec<Comment> {
    let mut roots: Vec<Comment> = Vec::new();
    // (author, index of the root holding that comment), in input order.
    let mut seen: Vec<(String, usize)> = Vec::new();

    for mut comment in comments {
        comment.replies.clear();
        let author = comment.author.clone();

        match addressed_root(&comment.content, &seen) {
            Some(root) => {
                roots[root].replies.push(comment);
                seen.push((author, root));
            }
            None => {
                roots.push(comment);
                seen.push((author, roots.len() - 1));
            }
        }
    }

    roots
}

/// First earlier comment (input order) whose `@author` appears in `content`.
///
/// This is a plain substring match, so `@bob` also matches a body that
/// mentions `@bobby`.
fn addressed_root(content: &str, seen: &[(String, usize)]) -> Option<usize> {
    if !content.contains('@') {
        return None;
    }
    seen.iter()
        .find(|(author, _)| !author.is_empty() && content.contains(&format!("@{author}")))
        .map(|(_, root)| *root)
}
