//! Read-only toy filesystem and the guest shell that walks it.

use chrono::Local;
use std::sync::OnceLock;

pub const HOME: &str = "~";
pub const USER: &str = "guest";
pub const HOST: &str = "yuzu-os";

pub const BANNER: &[&str] = &[
    "Welcome to YuzuOS v1.0.0 (Ubuntu-based)",
    "Copyright (c) 2024 Masuo Yuzuki",
    "",
    "Type 'help' to see available commands.",
    "",
];

const HELP: &str = "GNU bash, version 5.1.16(1)-release (x86_64-pc-linux-gnu)
These shell commands are defined internally.  Type 'help' to see this list.

Available commands:
  ls [dir]    List directory contents
  cd [dir]    Change directory
  cat [file]  Display file content
  pwd         Print working directory
  clear       Clear terminal screen
  whoami      Show current user
  date        Show system date/time
  open [app]  Open an application (e.g., 'open about')";

// ── Tree ──────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum Node {
    File(&'static str),
    Dir(Vec<(&'static str, Node)>),
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Dir(children) => children.iter().find(|(n, _)| *n == name).map(|(_, c)| c),
            Node::File(_) => None,
        }
    }
}

pub fn root() -> &'static Node {
    static ROOT: OnceLock<Node> = OnceLock::new();
    ROOT.get_or_init(|| {
        Node::Dir(vec![
            (
                "projects",
                Node::Dir(vec![
                    (
                        "yuzu_os.txt",
                        Node::File(
                            "PROJECT: YuzuOS\nSTATUS: Active\nSTACK: React, TypeScript, Tailwind\nDESC: A web-based operating system portfolio.",
                        ),
                    ),
                    (
                        "eco_tracker.md",
                        Node::File("# EcoTracker Mobile\nA cross-platform app for sustainable living."),
                    ),
                    (
                        "dataviz_dashboard",
                        Node::Dir(vec![
                            ("readme.txt", Node::File("Data Visualization Dashboard using D3.js.")),
                            ("data.csv", Node::File("id,value\n1,100\n2,200")),
                        ]),
                    ),
                ]),
            ),
            (
                "about.txt",
                Node::File(
                    "Name: Masuo Yuzuki\nRole: Frontend Engineer / Student\nUniversity: Information Systems (4th Year)\nLocation: Tokyo, Japan",
                ),
            ),
            (
                "skills.json",
                Node::File(
                    "{\n  \"frontend\": [\"React\", \"TypeScript\", \"Next.js\"],\n  \"backend\": [\"Node.js\", \"Python\"],\n  \"tools\": [\"Docker\", \"AWS\", \"Figma\"]\n}",
                ),
            ),
            (
                "contact.info",
                Node::File(
                    "Email: yuzuki.dev@example.com\nGitHub: github.com/yuzuki\nLinkedIn: linkedin.com/in/yuzuki",
                ),
            ),
            (
                "hidden",
                Node::Dir(vec![(
                    "secret.txt",
                    Node::File(
                        "You found the secret file! The password for the admin panel is \"admin123\" (just kidding).",
                    ),
                )]),
            ),
        ])
    })
}

/// Walk `path` (first element is always `~`) down from the root.
pub fn node_at(path: &[String]) -> Option<&'static Node> {
    path.iter()
        .skip(1)
        .try_fold(root(), |node, name| node.child(name))
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TerminalSession {
    history: Vec<String>,
    cwd: Vec<String>,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self {
            history: BANNER.iter().map(|l| l.to_string()).collect(),
            cwd: vec![HOME.to_string()],
        }
    }
}

impl TerminalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    pub fn prompt(&self) -> String {
        format!("{USER}@{HOST}:{}$", self.cwd.join("/"))
    }

    /// Ctrl+C: echo `^C` after the prompt.
    pub fn interrupt(&mut self) {
        let line = format!("{} ^C", self.prompt());
        self.history.push(line);
    }

    pub fn execute(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            let prompt = self.prompt();
            self.history.push(prompt);
            return;
        }

        let echo = format!("{} {raw}", self.prompt());
        let mut words = trimmed.split_whitespace();
        let cmd = words.next().unwrap_or_default();
        let arg = words.collect::<Vec<_>>().join(" ");

        let output = match cmd.to_lowercase().as_str() {
            "help" => HELP.to_string(),
            "ls" => self.ls(&arg),
            "cd" => self.cd(&arg),
            "cat" => self.cat(&arg),
            "pwd" => self.pwd(),
            "whoami" => USER.to_string(),
            "date" => Local::now().format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
            "clear" => {
                self.history.clear();
                return;
            }
            "sudo" => format!("[sudo] password for {USER}: \nSorry, try again."),
            "rm" => {
                let target = if arg.is_empty() { "file" } else { arg.as_str() };
                format!("rm: cannot remove '{target}': Permission denied")
            }
            "open" => format!("Opening {arg}... (Simulated: Use UI to open apps)"),
            _ if cmd == "exit" => "logout".to_string(),
            _ => format!("Command not found: {cmd}"),
        };

        self.history.push(echo);
        if !output.is_empty() {
            self.history.push(output);
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    fn ls(&self, arg: &str) -> String {
        let target = if arg.is_empty() {
            node_at(&self.cwd)
        } else {
            match self.resolve(arg) {
                Some(path) => node_at(&path),
                None => return format!("ls: cannot access '{arg}': No such file or directory"),
            }
        };
        match target {
            Some(Node::Dir(children)) => children
                .iter()
                .map(|(name, node)| {
                    if node.is_dir() {
                        format!("{name}/")
                    } else {
                        name.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("  "),
            _ => String::new(),
        }
    }

    fn cd(&mut self, arg: &str) -> String {
        if arg.is_empty() || arg == HOME {
            self.cwd = vec![HOME.to_string()];
            return String::new();
        }
        let Some(path) = self.resolve(arg) else {
            return format!("cd: {arg}: No such file or directory");
        };
        match node_at(&path) {
            Some(node) if node.is_dir() => {
                self.cwd = path;
                String::new()
            }
            _ => format!("cd: {arg}: Not a directory"),
        }
    }

    fn cat(&self, arg: &str) -> String {
        if arg.is_empty() {
            return "cat: missing file operand".to_string();
        }
        match node_at(&self.cwd).and_then(|dir| dir.child(arg)) {
            Some(Node::File(content)) => content.to_string(),
            Some(Node::Dir(_)) => format!("cat: {arg}: Is a directory"),
            None => format!("cat: {arg}: No such file or directory"),
        }
    }

    fn pwd(&self) -> String {
        let rest = self.cwd[1..].join("/");
        if rest.is_empty() {
            format!("/home/{USER}")
        } else {
            format!("/home/{USER}/{rest}")
        }
    }

    /// Resolve `target` against the working directory. `/` and `~` both mean
    /// the home root. Every named segment must exist as a child directory;
    /// a file name is accepted as the last segment.
    fn resolve(&self, target: &str) -> Option<Vec<String>> {
        let mut path = if target.starts_with('/') {
            vec![HOME.to_string()]
        } else {
            self.cwd.clone()
        };
        for part in target.split('/').filter(|p| !p.is_empty()) {
            match part {
                "." => {}
                ".." => {
                    if path.len() > 1 {
                        path.pop();
                    }
                }
                HOME => path = vec![HOME.to_string()],
                name => {
                    let node = node_at(&path)?;
                    if !node.is_dir() {
                        return None;
                    }
                    node.child(name)?;
                    path.push(name.to_string());
                }
            }
        }
        Some(path)
    }
}
