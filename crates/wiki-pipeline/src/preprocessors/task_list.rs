//! Task list items to disabled checkboxes.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::map_prose_lines;
use crate::registry::Preprocessor;

/// List marker followed by `[ ]`, `[x]` or `[X]`.
static TASK_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*(?:[-*+]|\d+[.)])\s+)\[([ xX])\](\s)").unwrap()
});

/// Turns `- [ ] item` into a list item starting with a disabled checkbox.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskList;

impl Preprocessor for TaskList {
    fn name(&self) -> &'static str {
        "task-list"
    }

    fn process(&self, body: &str, _doc_path: &str) -> String {
        map_prose_lines(body, |line| {
            TASK_ITEM_RE
                .replace(line, |caps: &Captures<'_>| {
                    let checked = if &caps[2] == " " { "" } else { " checked" };
                    format!(
                        r#"{}<input type="checkbox" class="task-checkbox" disabled{checked}>{}"#,
                        &caps[1], &caps[3]
                    )
                })
                .into_owned()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_items() {
        assert_eq!(
            TaskList.process("- [ ] open\n* [x] done\n  1. [X] nested\n", ""),
            concat!(
                "- <input type=\"checkbox\" class=\"task-checkbox\" disabled> open\n",
                "* <input type=\"checkbox\" class=\"task-checkbox\" disabled checked> done\n",
                "  1. <input type=\"checkbox\" class=\"task-checkbox\" disabled checked> nested\n",
            )
        );
    }

    #[test]
    fn test_non_task_lines_untouched() {
        let input = "[ ] not a list\n- [link](x)\n- [y]\n```\n- [ ] code\n```\n";
        assert_eq!(TaskList.process(input, ""), input);
    }

    #[test]
    fn test_idempotent() {
        let once = TaskList.process("- [x] done\n", "");
        assert_eq!(TaskList.process(&once, ""), once);
    }
}
