use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Color32, Context};

use crate::backend::{BackendClient, Commentary, ConversationHistory, ProcessOutcome, UploadOutcome};
use crate::chat::{Carousel, ChatGraph, GraphKind, collect_chat_graph};
use crate::config::StartPage;

use self::camera::{OrbitCamera, Projected, Vec3};
use self::selection::Selection;
use self::ui::draw_loading;

mod camera;
mod graph;
mod highlight;
mod render_utils;
mod selection;
mod ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Route {
    Home,
    Graph(GraphKind),
    Metrics,
}

impl From<StartPage> for Route {
    fn from(page: StartPage) -> Self {
        match page {
            StartPage::Home => Self::Home,
            StartPage::Global => Self::Graph(GraphKind::Global),
            StartPage::Local => Self::Graph(GraphKind::Local),
            StartPage::Metrics => Self::Metrics,
        }
    }
}

/// A single background job whose result is picked up by polling each frame.
pub(in crate::app) struct Task<T> {
    rx: Receiver<Result<T, String>>,
}

impl<T: Send + 'static> Task<T> {
    pub(in crate::app) fn spawn<F>(label: &'static str, job: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = job().map_err(|error| {
                log::error!("{label} failed: {error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        Self { rx }
    }
}

impl<T> Task<T> {
    pub(in crate::app) fn poll(&self) -> Option<Result<T, String>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err("Background worker disconnected".to_owned()))
            }
        }
    }
}

pub(in crate::app) enum LoadState<T> {
    Loading(Task<T>),
    Ready(T),
    Error(String),
}

impl<T> LoadState<T> {
    /// Moves a finished task into `Ready` or `Error`. Returns whether the
    /// job is still running.
    pub(in crate::app) fn poll(&mut self) -> bool {
        if let Self::Loading(task) = self
            && let Some(result) = task.poll()
        {
            *self = match result {
                Ok(value) => Self::Ready(value),
                Err(error) => Self::Error(error),
            };
        }

        matches!(self, Self::Loading(_))
    }
}

pub struct ConstellationApp {
    client: BackendClient,
    page: Page,
}

enum Page {
    Home(Box<HomePage>),
    Graph(GraphPage),
    Metrics(Box<MetricsPage>),
}

#[derive(Default)]
struct HomePage {
    file_path: String,
    feedback: Option<String>,
    upload: Option<Task<UploadOutcome>>,
    awaiting_username: bool,
    username: String,
    process: Option<Task<ProcessOutcome>>,
}

struct GraphPage {
    kind: GraphKind,
    state: LoadState<Box<ViewModel>>,
}

struct MetricsPage {
    history: LoadState<ConversationHistory>,
    carousel: Carousel,
    commentary: HashMap<&'static str, LoadState<Commentary>>,
}

struct ViewModel {
    graph: ChatGraph,
    selection: Selection,
    camera: OrbitCamera,
    user_filter: String,
    show_info: bool,
    render_graph: RenderGraph,
    visible_node_count: usize,
    visible_edge_count: usize,
}

struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<(usize, usize)>,
    view_scratch: ViewScratch,
}

struct RenderNode {
    id: String,
    world_pos: Vec3,
    color: Color32,
}

#[derive(Default)]
struct ViewScratch {
    projected: Vec<Option<Projected>>,
    screen_radii: Vec<f32>,
    draw_order: Vec<usize>,
}

struct HighlightState {
    selected: usize,
    related_nodes: HashSet<usize>,
    related_edges: HashSet<(usize, usize)>,
}

impl ConstellationApp {
    pub fn new(cc: &eframe::CreationContext<'_>, client: BackendClient, start: StartPage) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        log::info!("using backend at {}", client.base());

        let page = Self::open(&client, Route::from(start));
        Self { client, page }
    }

    fn open(client: &BackendClient, route: Route) -> Page {
        log::debug!("entering {route:?}");
        match route {
            Route::Home => Page::Home(Box::default()),
            Route::Graph(kind) => Page::Graph(GraphPage::load(client, kind)),
            Route::Metrics => Page::Metrics(Box::new(MetricsPage::load(client))),
        }
    }
}

impl eframe::App for ConstellationApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut navigation = None;

        let pending = match &mut self.page {
            Page::Home(page) => page.show(ctx, &self.client, &mut navigation),
            Page::Graph(page) => page.show(ctx, &mut navigation),
            Page::Metrics(page) => page.show(ctx, &self.client, &mut navigation),
        };

        if pending {
            ctx.request_repaint_after(POLL_INTERVAL);
        }

        // Re-entering a page always refetches; whatever the old page was
        // waiting for is dropped with its receiver.
        if let Some(route) = navigation {
            self.page = Self::open(&self.client, route);
        }
    }
}

impl GraphPage {
    fn load(client: &BackendClient, kind: GraphKind) -> Self {
        let client = client.clone();
        let task = Task::spawn("graph load", move || {
            collect_chat_graph(&client, kind).map(|graph| Box::new(ViewModel::new(graph)))
        });

        Self {
            kind,
            state: LoadState::Loading(task),
        }
    }

    fn show(&mut self, ctx: &Context, navigation: &mut Option<Route>) -> bool {
        let pending = self.state.poll();

        match &mut self.state {
            LoadState::Loading(_) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    draw_loading(ui, &format!("Loading {}...", self.kind.label()));
                });
            }
            LoadState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading(format!("Failed to load the {}", self.kind.label()));
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Retry").clicked() {
                            *navigation = Some(Route::Graph(self.kind));
                        }
                        if ui.button("Home").clicked() {
                            *navigation = Some(Route::Home);
                        }
                    });
                });
            }
            LoadState::Ready(model) => model.show(ctx, navigation),
        }

        pending
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Instant;

    use anyhow::anyhow;

    use super::*;

    pub(crate) fn sample_graph() -> ChatGraph {
        let raw = r##"{
            "alice": {"favorite_topic": "games", "three_d_embedding": [0.0, 0.0, 0.0], "color": "#ff0000"},
            "bob": {"favorite_topic": "music", "three_d_embedding": [0.0, 0.0, 10.0]},
            "carol": {"favorite_topic": "books", "three_d_embedding": [0.0, 0.0, 20.0]}
        }"##;
        ChatGraph::from_payload(GraphKind::Global, Some("alice".to_owned()), raw)
            .expect("sample payload parses")
    }

    fn wait_for<T>(state: &mut LoadState<T>) {
        let started = Instant::now();
        while state.poll() {
            assert!(started.elapsed() < Duration::from_secs(5), "task never finished");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn finished_tasks_become_ready() {
        let mut state = LoadState::Loading(Task::spawn("test", || Ok(42)));
        wait_for(&mut state);
        assert!(matches!(state, LoadState::Ready(42)));
        assert!(!state.poll());
    }

    #[test]
    fn failed_tasks_keep_the_whole_error_chain() {
        let mut state: LoadState<()> = LoadState::Loading(Task::spawn("test", || {
            Err(anyhow!("connection refused").context("request to backend failed"))
        }));
        wait_for(&mut state);

        let LoadState::Error(error) = state else {
            panic!("expected an error state");
        };
        assert!(error.contains("request to backend failed"));
        assert!(error.contains("connection refused"));
    }

    #[test]
    fn start_pages_map_to_routes() {
        assert_eq!(Route::from(StartPage::Home), Route::Home);
        assert_eq!(
            Route::from(StartPage::Local),
            Route::Graph(GraphKind::Local)
        );
        assert_eq!(Route::from(StartPage::Metrics), Route::Metrics);
    }
}
