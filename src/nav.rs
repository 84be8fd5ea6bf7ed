//! Navigation state machine: which view is active, what page each view is
//! on, and how keystrokes turn into commands.
//!
//! `>` and `<` act immediately when nothing has been typed yet. Anything
//! else accumulates into a line command that runs on Enter.

use anyhow::Result;
use chrono::Local;

use crate::data::{TopicCache, TopicSource};
use crate::display::Display;
use crate::error::InputError;
use crate::input::{InputDriver, Key};
use crate::pager::{Pager, Turn};
use crate::thread;
use crate::ui;
use crate::v2ex::{Comment, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    TopicList,
    TopicDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Back,
    Refresh,
    Quit,
    Open(String),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let command = line.trim().to_lowercase();
        match command.as_str() {
            "" => Command::Empty,
            "h" => Command::Help,
            "b" => Command::Back,
            "r" => Command::Refresh,
            "q" => Command::Quit,
            digits if digits.chars().all(|ch| ch.is_ascii_digit()) => {
                Command::Open(digits.to_string())
            }
            _ => Command::Unknown(command),
        }
    }
}

/// Everything the session knows. `comment_pager`, `current_topic`,
/// `topic_content` and `comment_tree` describe the last opened topic and are
/// only shown while `active_view` is `TopicDetail`.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub active_view: View,
    pub topics: Vec<Topic>,
    pub topic_pager: Pager,
    pub comment_pager: Pager,
    pub current_topic: Option<Topic>,
    pub topic_content: String,
    pub comment_tree: Vec<Comment>,
}

impl ViewState {
    pub fn new(topics_per_page: usize, comments_per_page: usize) -> Self {
        Self {
            active_view: View::TopicList,
            topics: Vec::new(),
            topic_pager: Pager::new(topics_per_page),
            comment_pager: Pager::new(comments_per_page),
            current_topic: None,
            topic_content: String::new(),
            comment_tree: Vec::new(),
        }
    }

    pub fn topic_page(&self) -> usize {
        self.topic_pager.page()
    }

    pub fn comment_page(&self) -> usize {
        self.comment_pager.page()
    }

    fn forget_topic(&mut self) {
        self.current_topic = None;
        self.topic_content.clear();
        self.comment_tree.clear();
        self.comment_pager.reset();
    }
}

pub struct Navigator<S, C, D> {
    source: S,
    cache: C,
    display: D,
    state: ViewState,
    buffer: String,
    width: usize,
}

impl<S: TopicSource, C: TopicCache, D: Display> Navigator<S, C, D> {
    pub fn new(source: S, cache: C, display: D, state: ViewState) -> Self {
        Self {
            source,
            cache,
            display,
            state,
            buffer: String::new(),
            width: ui::DEFAULT_WIDTH,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(20);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Reads keys until quit, interrupt or end of input, then clears the
    /// screen.
    pub fn run(&mut self, input: &mut dyn InputDriver) -> Result<()> {
        self.start()?;
        loop {
            let key = input.read_key()?;
            if self.handle_key(key, input.echoes())? == Flow::Exit {
                break;
            }
        }
        tracing::info!("session ended");
        self.display.clear()
    }

    /// Shows the topic list, restored from the cache when it holds topics and
    /// fetched otherwise.
    pub fn start(&mut self) -> Result<()> {
        match self.cache.load() {
            Ok(Some(cached)) if !cached.topics.is_empty() => {
                tracing::info!(count = cached.topics.len(), "restored topics from cache");
                let count = cached.topics.len();
                self.state.topics = cached.topics;
                self.render()?;
                self.display.notice(&format!(
                    "Loaded {count} topics from cache (saved {}). Type r and Enter to refresh.",
                    cached.timestamp.format("%Y-%m-%d %H:%M")
                ))?;
            }
            Ok(_) => {
                tracing::info!("topic cache empty");
                self.fetch_topics()?;
            }
            Err(err) => {
                tracing::warn!("treating unreadable cache as empty: {err}");
                self.fetch_topics()?;
            }
        }
        self.display.notice(ui::START_HINT)
    }

    /// `echoed` tells whether the terminal already displayed the key.
    pub fn handle_key(&mut self, key: Key, echoed: bool) -> Result<Flow> {
        match key {
            Key::Interrupt | Key::Eof => return Ok(Flow::Exit),
            Key::Char(ch @ ('>' | '<')) if self.buffer.is_empty() => {
                self.turn_page(ch == '>')?;
            }
            Key::Char(ch) => {
                self.buffer.push(ch);
                if !echoed {
                    self.display.echo(ch)?;
                }
            }
            Key::Backspace => {
                if let Some(ch) = self.buffer.pop() {
                    if !echoed {
                        self.display.erase(ch)?;
                    }
                }
            }
            Key::Enter => {
                if !echoed {
                    self.display.newline()?;
                }
                let line = std::mem::take(&mut self.buffer);
                return self.dispatch(Command::parse(&line));
            }
        }
        Ok(Flow::Continue)
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Empty => {}
            Command::Help => self.display.render(&ui::help())?,
            Command::Back => {
                self.state.active_view = View::TopicList;
                self.render()?;
            }
            Command::Refresh => self.refresh()?,
            Command::Quit => return Ok(Flow::Exit),
            Command::Open(number) => self.open_topic(&number)?,
            Command::Unknown(text) => {
                self.display
                    .notice(&InputError::UnknownCommand(text).to_string())?;
            }
        }
        Ok(Flow::Continue)
    }

    fn turn_page(&mut self, forward: bool) -> Result<()> {
        let state = &mut self.state;
        let (pager, items) = match state.active_view {
            View::TopicDetail => (&mut state.comment_pager, state.comment_tree.len()),
            View::TopicList => (&mut state.topic_pager, state.topics.len()),
        };
        let turn: Turn = if forward { pager.next(items) } else { pager.prev() };

        match turn.notice() {
            Some(notice) => self.display.notice(notice),
            None => self.render(),
        }
    }

    fn open_topic(&mut self, number: &str) -> Result<()> {
        let count = self.state.topics.len();
        let index = match number.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => n - 1,
            _ => {
                let err = InputError::InvalidTopicNumber(number.to_string());
                return self.display.notice(&err.to_string());
            }
        };

        let topic = self.state.topics[index].clone();
        let loaded = self
            .state
            .current_topic
            .as_ref()
            .is_some_and(|current| current.is_same(&topic));

        if !loaded {
            self.display
                .notice(&format!("Loading topic: {}", topic.title))?;
            let detail = match self.source.load_topic(&topic) {
                Ok(detail) => detail,
                Err(err) => {
                    tracing::warn!(url = %topic.url, "topic load failed: {err}");
                    return self
                        .display
                        .notice(&format!("Could not load topic: {err}"));
                }
            };
            self.state.comment_tree = thread::build(detail.comments);
            self.state.topic_content = detail.content;
            self.state.current_topic = Some(topic);
            self.state.comment_pager.reset();
        }

        self.state.active_view = View::TopicDetail;
        self.render()
    }

    fn refresh(&mut self) -> Result<()> {
        if let Err(err) = self.cache.invalidate() {
            tracing::warn!("could not invalidate cache: {err}");
        }
        self.state.topics.clear();
        self.state.topic_pager.reset();
        self.state.forget_topic();
        self.state.active_view = View::TopicList;
        self.fetch_topics()
    }

    fn fetch_topics(&mut self) -> Result<()> {
        self.display.render(&ui::loading("Loading V2EX topics..."))?;
        match self.source.load_topics() {
            Ok(topics) => {
                if let Err(err) = self.cache.save(&topics, Local::now()) {
                    tracing::warn!("could not save topic cache: {err}");
                }
                self.state.topics = topics;
                self.render()
            }
            Err(err) => {
                tracing::warn!("topic index load failed: {err}");
                self.render()?;
                self.display
                    .notice(&format!("Could not load topics: {err}"))
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let state = &self.state;
        let lines = match (state.active_view, state.current_topic.as_ref()) {
            (View::TopicDetail, Some(topic)) => ui::topic_detail(
                topic,
                &state.topic_content,
                &state.comment_tree,
                &state.comment_pager,
                self.width,
            ),
            _ => ui::topic_list(&state.topics, &state.topic_pager, self.width),
        };
        self.display.render(&lines)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::io::{self, Cursor};
    use std::path::PathBuf;

    use chrono::{DateTime, Local};

    use super::*;
    use crate::error::{CacheError, FetchError, ParseError, SourceError};
    use crate::input::LineInput;
    use crate::storage::CachedTopics;
    use crate::v2ex::TopicDetail;

    fn topic(id: usize) -> Topic {
        Topic {
            title: format!("topic {id}"),
            url: format!("https://www.v2ex.com/t/{id}"),
            reply_count_label: "[0 replies]".to_string(),
            author: format!("author{id}"),
            created_time: String::new(),
        }
    }

    fn topics(count: usize) -> Vec<Topic> {
        (1..=count).map(topic).collect()
    }

    #[derive(Default)]
    struct FakeSource {
        topics: Vec<Topic>,
        comments: Vec<Comment>,
        fail_index: bool,
        fail_topic: bool,
        index_loads: Cell<usize>,
        topic_loads: Cell<usize>,
    }

    impl TopicSource for FakeSource {
        fn load_topics(&self) -> Result<Vec<Topic>, SourceError> {
            self.index_loads.set(self.index_loads.get() + 1);
            if self.fail_index {
                return Err(ParseError::MissingElement("topic list").into());
            }
            Ok(self.topics.clone())
        }

        fn load_topic(&self, _topic: &Topic) -> Result<TopicDetail, SourceError> {
            self.topic_loads.set(self.topic_loads.get() + 1);
            if self.fail_topic {
                return Err(SourceError::Fetch(FetchError::Status {
                    url: "https://www.v2ex.com/t/1".to_string(),
                    status: reqwest::StatusCode::FORBIDDEN,
                }));
            }
            Ok(TopicDetail {
                content: "body".to_string(),
                comments: self.comments.clone(),
            })
        }
    }

    #[derive(Default)]
    struct FakeCache {
        stored: RefCell<Option<CachedTopics>>,
        invalidations: Cell<usize>,
        broken: bool,
    }

    impl FakeCache {
        fn with(topics: Vec<Topic>) -> Self {
            Self {
                stored: RefCell::new(Some(CachedTopics {
                    timestamp: Local::now(),
                    topics,
                })),
                invalidations: Cell::new(0),
                broken: false,
            }
        }

        fn broken() -> Self {
            Self {
                broken: true,
                ..Self::default()
            }
        }

        fn fail(&self, action: &'static str) -> Result<(), CacheError> {
            if !self.broken {
                return Ok(());
            }
            Err(CacheError::Io {
                action,
                path: PathBuf::from("/cache/topics.json"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    impl TopicCache for FakeCache {
        fn load(&self) -> Result<Option<CachedTopics>, CacheError> {
            self.fail("read")?;
            Ok(self.stored.borrow().clone())
        }

        fn save(&self, topics: &[Topic], timestamp: DateTime<Local>) -> Result<(), CacheError> {
            self.fail("write")?;
            *self.stored.borrow_mut() = Some(CachedTopics {
                timestamp,
                topics: topics.to_vec(),
            });
            Ok(())
        }

        fn invalidate(&self) -> Result<(), CacheError> {
            self.invalidations.set(self.invalidations.get() + 1);
            self.fail("remove")?;
            *self.stored.borrow_mut() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        frames: Vec<Vec<String>>,
        notices: Vec<String>,
        typed: String,
        clears: usize,
    }

    impl RecordingDisplay {
        fn last_frame(&self) -> &[String] {
            self.frames.last().map(Vec::as_slice).unwrap_or(&[])
        }

        fn last_notice(&self) -> &str {
            self.notices.last().map(String::as_str).unwrap_or("")
        }
    }

    impl Display for RecordingDisplay {
        fn clear(&mut self) -> Result<()> {
            self.clears += 1;
            Ok(())
        }

        fn render(&mut self, lines: &[String]) -> Result<()> {
            self.frames.push(lines.to_vec());
            Ok(())
        }

        fn notice(&mut self, message: &str) -> Result<()> {
            self.notices.push(message.to_string());
            Ok(())
        }

        fn echo(&mut self, ch: char) -> Result<()> {
            self.typed.push(ch);
            Ok(())
        }

        fn erase(&mut self, _ch: char) -> Result<()> {
            self.typed.pop();
            Ok(())
        }

        fn newline(&mut self) -> Result<()> {
            self.typed.push('\n');
            Ok(())
        }
    }

    type TestNavigator = Navigator<FakeSource, FakeCache, RecordingDisplay>;

    fn navigator(source: FakeSource, cache: FakeCache) -> TestNavigator {
        let mut nav = Navigator::new(source, cache, RecordingDisplay::default(), ViewState::new(12, 5));
        nav.start().unwrap();
        nav
    }

    fn cached(count: usize) -> TestNavigator {
        navigator(FakeSource::default(), FakeCache::with(topics(count)))
    }

    fn press(nav: &mut TestNavigator, keys: &str) -> Flow {
        let mut flow = Flow::Continue;
        for ch in keys.chars() {
            let key = if ch == '\n' { Key::Enter } else { Key::Char(ch) };
            flow = nav.handle_key(key, false).unwrap();
        }
        flow
    }

    fn frame_has(nav: &TestNavigator, line: &str) -> bool {
        nav.display().last_frame().iter().any(|l| l == line)
    }

    fn comments(roots: usize) -> Vec<Comment> {
        let mut flat = Vec::new();
        for n in 1..=roots {
            flat.push(Comment::new(n.to_string(), format!("user{n}"), "", "hi"));
        }
        flat.push(Comment::new("99", "replier", "", "@user1 reply"));
        flat
    }

    #[test]
    fn start_restores_cached_topics_without_fetching() {
        let nav = cached(3);
        assert_eq!(nav.source().index_loads.get(), 0);
        assert_eq!(nav.state().topics.len(), 3);
        assert!(frame_has(&nav, "[1] topic 1 [0 replies]"));
        assert!(nav.display().notices[0].starts_with("Loaded 3 topics from cache"));
        assert_eq!(nav.display().last_notice(), ui::START_HINT);
    }

    #[test]
    fn start_fetches_and_saves_when_cache_is_empty() {
        let source = FakeSource {
            topics: topics(2),
            ..FakeSource::default()
        };
        let nav = navigator(source, FakeCache::default());
        assert_eq!(nav.source().index_loads.get(), 1);
        assert_eq!(nav.state().topics.len(), 2);
        let saved = nav.cache().stored.borrow().clone().unwrap();
        assert_eq!(saved.topics, topics(2));
    }

    #[test]
    fn start_fetches_when_cached_list_is_empty() {
        let source = FakeSource {
            topics: topics(3),
            ..FakeSource::default()
        };
        let nav = navigator(source, FakeCache::with(Vec::new()));
        assert_eq!(nav.source().index_loads.get(), 1);
        assert_eq!(nav.state().topics, topics(3));
        assert!(!nav
            .display()
            .notices
            .iter()
            .any(|n| n.starts_with("Loaded")));
    }

    #[test]
    fn unusable_cache_counts_as_a_miss() {
        let source = FakeSource {
            topics: topics(3),
            ..FakeSource::default()
        };
        let mut nav = navigator(source, FakeCache::broken());
        assert_eq!(nav.source().index_loads.get(), 1);
        assert_eq!(nav.state().topics, topics(3));
        assert!(frame_has(&nav, "[3] topic 3 [0 replies]"));
        assert!(nav.cache().stored.borrow().is_none());

        assert_eq!(press(&mut nav, "r\n"), Flow::Continue);
        assert_eq!(nav.cache().invalidations.get(), 1);
        assert_eq!(nav.source().index_loads.get(), 2);
        assert_eq!(nav.state().topics, topics(3));
        assert!(!nav
            .display()
            .notices
            .iter()
            .any(|n| n.starts_with("Could not")));
    }

    #[test]
    fn start_survives_failed_fetch() {
        let source = FakeSource {
            fail_index: true,
            ..FakeSource::default()
        };
        let nav = navigator(source, FakeCache::default());
        assert!(nav.state().topics.is_empty());
        assert!(frame_has(&nav, "Page 1/0"));
        assert!(nav
            .display()
            .notices
            .iter()
            .any(|n| n.starts_with("Could not load topics")));
    }

    #[test]
    fn instant_commands_turn_topic_pages() {
        let mut nav = cached(25);
        press(&mut nav, ">");
        assert_eq!(nav.state().topic_page(), 2);
        assert!(frame_has(&nav, "[13] topic 13 [0 replies]"));
        press(&mut nav, ">");
        assert_eq!(nav.state().topic_page(), 3);
        assert!(frame_has(&nav, "Page 3/3"));

        let frames = nav.display().frames.len();
        press(&mut nav, ">");
        assert_eq!(nav.state().topic_page(), 3);
        assert_eq!(nav.display().last_notice(), "Already at the last page.");
        assert_eq!(nav.display().frames.len(), frames);

        press(&mut nav, "<<<");
        assert_eq!(nav.state().topic_page(), 1);
        assert_eq!(nav.display().last_notice(), "Already at the first page.");
    }

    #[test]
    fn angle_bracket_inside_a_line_is_buffered() {
        let mut nav = cached(25);
        press(&mut nav, "1>");
        assert_eq!(nav.buffer(), "1>");
        assert_eq!(nav.state().topic_page(), 1);
        press(&mut nav, "\n");
        assert_eq!(nav.buffer(), "");
        assert_eq!(nav.display().last_notice(), "Unknown command \"1>\". Use h for help.");
    }

    #[test]
    fn opening_a_topic_enters_detail_on_first_comment_page() {
        let source = FakeSource {
            comments: comments(6),
            ..FakeSource::default()
        };
        let mut nav = navigator(source, FakeCache::with(topics(8)));
        press(&mut nav, "5\n");
        assert_eq!(nav.state().active_view, View::TopicDetail);
        assert_eq!(nav.state().comment_page(), 1);
        assert_eq!(nav.state().current_topic.as_ref().unwrap().title, "topic 5");
        assert_eq!(nav.source().topic_loads.get(), 1);
        assert!(frame_has(&nav, "Title: topic 5"));
        assert!(frame_has(&nav, "    ↳ #99 replier"));
    }

    #[test]
    fn reopening_the_loaded_topic_does_not_refetch() {
        let source = FakeSource {
            comments: comments(12),
            ..FakeSource::default()
        };
        let mut nav = navigator(source, FakeCache::with(topics(8)));
        press(&mut nav, "5\n>");
        assert_eq!(nav.state().comment_page(), 2);
        press(&mut nav, "b\n5\n");
        assert_eq!(nav.source().topic_loads.get(), 1);
        assert_eq!(nav.state().active_view, View::TopicDetail);
        assert_eq!(nav.state().comment_page(), 2);

        press(&mut nav, "6\n");
        assert_eq!(nav.source().topic_loads.get(), 2);
        assert_eq!(nav.state().comment_page(), 1);
    }

    #[test]
    fn comment_pages_count_top_level_comments_only() {
        let source = FakeSource {
            comments: comments(5),
            ..FakeSource::default()
        };
        let mut nav = navigator(source, FakeCache::with(topics(1)));
        press(&mut nav, "1\n");
        assert_eq!(nav.state().comment_tree.len(), 5);
        assert!(nav
            .display()
            .last_frame()
            .last()
            .unwrap()
            .starts_with("Comments page 1/1"));
        press(&mut nav, ">");
        assert_eq!(nav.state().comment_page(), 1);
        assert_eq!(nav.display().last_notice(), "Already at the last page.");
    }

    #[test]
    fn back_returns_to_the_previous_topic_page() {
        let source = FakeSource {
            comments: comments(12),
            ..FakeSource::default()
        };
        let mut nav = navigator(source, FakeCache::with(topics(30)));
        press(&mut nav, ">");
        press(&mut nav, "14\n");
        press(&mut nav, ">>");
        assert_eq!(nav.state().comment_page(), 3);
        assert_eq!(nav.state().topic_page(), 2);

        press(&mut nav, "b\n");
        assert_eq!(nav.state().active_view, View::TopicList);
        assert_eq!(nav.state().topic_page(), 2);
        assert!(frame_has(&nav, "[14] topic 14 [0 replies]"));
    }

    #[test]
    fn back_on_topic_list_redisplays_it() {
        let mut nav = cached(3);
        let frames = nav.display().frames.len();
        press(&mut nav, "b\n");
        assert_eq!(nav.state().active_view, View::TopicList);
        assert_eq!(nav.display().frames.len(), frames + 1);
    }

    #[test]
    fn refresh_clears_cache_and_resets_topic_page() {
        let source = FakeSource {
            topics: topics(15),
            ..FakeSource::default()
        };
        let mut nav = navigator(source, FakeCache::with(topics(30)));
        press(&mut nav, ">>");
        press(&mut nav, "1\n");
        assert_eq!(nav.state().topic_page(), 3);

        press(&mut nav, "R\n");
        assert_eq!(nav.cache().invalidations.get(), 1);
        assert_eq!(nav.source().index_loads.get(), 1);
        assert_eq!(nav.state().topic_page(), 1);
        assert_eq!(nav.state().active_view, View::TopicList);
        assert!(nav.state().current_topic.is_none());
        assert_eq!(nav.state().topics, topics(15));
        assert_eq!(nav.cache().stored.borrow().as_ref().unwrap().topics.len(), 15);
    }

    #[test]
    fn out_of_range_topic_number_is_reported() {
        let mut nav = cached(3);
        press(&mut nav, "4\n");
        assert_eq!(nav.display().last_notice(), "Invalid topic number: 4");
        press(&mut nav, "0\n");
        assert_eq!(nav.display().last_notice(), "Invalid topic number: 0");
        assert_eq!(nav.state().active_view, View::TopicList);
        assert_eq!(nav.source().topic_loads.get(), 0);
    }

    #[test]
    fn failed_topic_load_keeps_state() {
        let source = FakeSource {
            fail_topic: true,
            ..FakeSource::default()
        };
        let mut nav = navigator(source, FakeCache::with(topics(3)));
        press(&mut nav, "2\n");
        assert_eq!(nav.state().active_view, View::TopicList);
        assert!(nav.state().current_topic.is_none());
        assert!(nav.display().last_notice().starts_with("Could not load topic"));
    }

    #[test]
    fn help_and_unknown_commands_leave_state_alone() {
        let mut nav = cached(3);
        press(&mut nav, " H \n");
        assert!(frame_has(&nav, "Commands:"));
        assert_eq!(nav.state().active_view, View::TopicList);

        let notices = nav.display().notices.len();
        press(&mut nav, "\n");
        assert_eq!(nav.display().notices.len(), notices);

        press(&mut nav, "xyz\n");
        assert_eq!(nav.display().last_notice(), "Unknown command \"xyz\". Use h for help.");
    }

    #[test]
    fn backspace_edits_the_buffer_and_the_echo() {
        let mut nav = cached(20);
        press(&mut nav, "13");
        nav.handle_key(Key::Backspace, false).unwrap();
        assert_eq!(nav.buffer(), "1");
        assert_eq!(nav.display().typed, "1");
        nav.handle_key(Key::Backspace, false).unwrap();
        nav.handle_key(Key::Backspace, false).unwrap();
        assert_eq!(nav.buffer(), "");
        press(&mut nav, "2\n");
        assert_eq!(nav.state().current_topic.as_ref().unwrap().title, "topic 2");
    }

    #[test]
    fn echo_is_skipped_when_terminal_echoes() {
        let mut nav = cached(3);
        nav.handle_key(Key::Char('h'), true).unwrap();
        assert!(nav.display().typed.is_empty());
        assert_eq!(nav.buffer(), "h");
    }

    #[test]
    fn quit_and_interrupt_exit() {
        let mut nav = cached(3);
        assert_eq!(press(&mut nav, "q\n"), Flow::Exit);
        assert_eq!(nav.handle_key(Key::Interrupt, false).unwrap(), Flow::Exit);
        assert_eq!(nav.handle_key(Key::Eof, true).unwrap(), Flow::Exit);
    }

    #[test]
    fn command_parse_normalises_input() {
        assert_eq!(Command::parse("  Q "), Command::Quit);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("042"), Command::Open("042".to_string()));
        assert_eq!(Command::parse("-1"), Command::Unknown("-1".to_string()));
    }

    #[test]
    fn run_drives_the_session_from_line_input() {
        let source = FakeSource {
            comments: comments(3),
            ..FakeSource::default()
        };
        let mut nav = Navigator::new(
            source,
            FakeCache::with(topics(20)),
            RecordingDisplay::default(),
            ViewState::new(12, 5),
        );
        let mut input = LineInput::new(Cursor::new(b">\n5\n5\nb\nq\n".to_vec()));
        nav.run(&mut input).unwrap();

        assert_eq!(nav.state().topic_page(), 2);
        assert_eq!(nav.state().active_view, View::TopicList);
        assert_eq!(nav.source().topic_loads.get(), 1);
        assert_eq!(nav.display().clears, 1);
        assert!(nav.display().typed.is_empty());
    }
}
