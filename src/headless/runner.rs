//! Headless mode runner - single update loop fed by a command reader task

use std::path::{Path, PathBuf};

use form_tabs_app::config::Settings;
use form_tabs_app::{BrowserLocation, BusEvent, Page, PanelContext, PanelId};
use form_tabs_core::prelude::*;
use form_tabs_core::{FieldDescriptor, TabGroup, Theme};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{HeadlessCommand, HeadlessEvent};

/// Origin used to turn the `--path` option into a page URL
const ORIGIN: &str = "http://localhost";

/// A parsed command, or the reason a line was rejected
pub type CommandLine = std::result::Result<HeadlessCommand, String>;

/// Command line options of a headless run
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// JSON file holding a field descriptor list or a tab group
    pub fields: PathBuf,
    /// Resource id; `None` simulates a create form
    pub resource_id: Option<String>,
    /// Initial location fragment
    pub fragment: Option<String>,
    /// Page path
    pub path: String,
    /// NDJSON command file; stdin when `None`
    pub events: Option<PathBuf>,
}

/// Build the page location from a path and optional fragment
pub fn location_for(path: &str, fragment: Option<&str>) -> Result<BrowserLocation> {
    let mut url = String::from(ORIGIN);
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    if let Some(fragment) = fragment.map(|f| f.trim_start_matches('#')) {
        if !fragment.is_empty() {
            url.push('#');
            url.push_str(fragment);
        }
    }
    BrowserLocation::parse(&url)
}

/// Contents of a `--fields` file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldsFile {
    /// Already flattened descriptors
    Fields(Vec<FieldDescriptor>),
    /// Tab definitions, flattened on load
    Group(TabGroup),
}

/// Read field descriptors from a JSON file
///
/// The file holds either a descriptor array or a tab group object.
pub fn load_fields(path: &Path) -> Result<Vec<FieldDescriptor>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fields from {}", path.display()))?;
    match serde_json::from_str(&content)? {
        FieldsFile::Fields(fields) => Ok(fields),
        FieldsFile::Group(group) => {
            debug!("Flattening tab group {:?}", group.name());
            Ok(group.into_descriptors())
        }
    }
}

/// One mounted panel plus the last state reported on stdout
pub struct HeadlessSession {
    page: Page,
    panel: PanelId,
    visible: Vec<String>,
    active: Option<String>,
    errors: Vec<String>,
    fragment: String,
    theme: Theme,
}

impl HeadlessSession {
    /// Mount the panel; returns the session and the events to report
    pub fn start(
        settings: &Settings,
        location: BrowserLocation,
        resource_id: Option<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<(Self, Vec<HeadlessEvent>)> {
        let mut page = Page::new(location);
        let context = PanelContext {
            resource_id,
            theme: Theme::default(),
        };
        let panel = page.mount(settings.panel.clone(), context, fields)?;
        let view = page.view(panel)?;

        let mut events = vec![HeadlessEvent::panel_mounted(
            &view.group,
            view.tabs.iter().map(|t| t.slug.clone()).collect(),
            view.visible.clone(),
            view.active.clone(),
        )];
        events.extend(broadcast_events(page.take_broadcasts()));
        let fragment = page.location().fragment().to_string();
        events.push(HeadlessEvent::fragment_changed(&fragment));

        let session = Self {
            visible: view.visible,
            active: view.active,
            errors: Vec::new(),
            fragment,
            theme: view.theme,
            page,
            panel,
        };
        Ok((session, events))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Run one command through the page and report what changed
    pub fn apply(&mut self, command: HeadlessCommand) -> Vec<HeadlessEvent> {
        let mut events = Vec::new();

        match command {
            HeadlessCommand::AttributeChanged { attribute, value } => {
                self.page.emit(BusEvent::AttributeChanged { attribute, value });
            }
            HeadlessCommand::ThemeSwitched { theme } => {
                self.page.emit(BusEvent::ThemeSwitched { theme });
            }
            HeadlessCommand::TabClicked { slug } => {
                if let Err(e) = self.page.click(self.panel, &slug) {
                    events.push(HeadlessEvent::error(e.to_string(), e.is_fatal()));
                }
            }
            HeadlessCommand::ValidationErrors { errors } => {
                self.page.set_validation_errors(errors);
            }
            HeadlessCommand::BeforeNavigate { url } => match self.page.before_navigate(&url) {
                Ok(target) => {
                    events.push(HeadlessEvent::navigation_target(target.as_str()));
                    // The visit lands on the target
                    self.page.set_location(BrowserLocation::from_url(target));
                }
                Err(e) => events.push(HeadlessEvent::error(e.to_string(), e.is_fatal())),
            },
            HeadlessCommand::NavigateStart => {
                if self.page.navigate_start() {
                    debug!("Restored captured fragment");
                }
            }
        }

        events.extend(self.collect_changes());
        events
    }

    /// Unmount the panel and reset the page
    pub fn finish(mut self) {
        self.page.teardown();
    }

    fn collect_changes(&mut self) -> Vec<HeadlessEvent> {
        let mut events = Vec::new();

        let view = match self.page.view(self.panel) {
            Ok(view) => view,
            Err(e) => {
                events.push(HeadlessEvent::error(e.to_string(), e.is_fatal()));
                return events;
            }
        };
        events.extend(broadcast_events(self.page.take_broadcasts()));

        if view.visible != self.visible {
            events.push(HeadlessEvent::visibility_changed(view.visible.clone()));
            self.visible = view.visible;
        }
        if view.active != self.active {
            events.push(HeadlessEvent::active_tab_changed(view.active.clone()));
            self.active = view.active;
        }

        let errors: Vec<String> = view
            .tabs
            .iter()
            .filter(|t| t.has_error)
            .map(|t| t.slug.clone())
            .collect();
        if errors != self.errors {
            events.push(HeadlessEvent::errors_marked(errors.clone()));
            self.errors = errors;
        }

        if view.theme != self.theme {
            events.push(HeadlessEvent::theme_changed(view.theme));
            self.theme = view.theme;
        }

        let fragment = self.page.location().fragment();
        if fragment != self.fragment {
            events.push(HeadlessEvent::fragment_changed(fragment));
            self.fragment = fragment.to_string();
        }

        events
    }
}

fn broadcast_events(broadcasts: Vec<BusEvent>) -> impl Iterator<Item = HeadlessEvent> {
    broadcasts.into_iter().filter_map(|event| match event {
        BusEvent::TabsChanged { group, tab } => Some(HeadlessEvent::tabs_changed(&group, &tab)),
        _ => None,
    })
}

/// Spawn the task that parses NDJSON commands from `reader`
pub fn spawn_command_reader<R>(reader: R, tx: mpsc::Sender<CommandLine>) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let parsed = HeadlessCommand::parse(trimmed).map_err(|e| {
                        warn!("Rejected command {:?}: {}", trimmed, e);
                        format!("Invalid command: {}", e)
                    });
                    if tx.send(parsed).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read commands: {}", e);
                    break;
                }
            }
        }
        info!("Command reader exiting");
    })
}

/// Run in headless mode - mount one panel and process commands until EOF
pub async fn run_headless(options: HeadlessOptions, settings: Settings) -> Result<()> {
    info!("form-tabs starting in HEADLESS mode");
    info!("Fields: {}", options.fields.display());

    let fields = load_fields(&options.fields)?;
    let location = location_for(&options.path, options.fragment.as_deref())?;

    let (mut session, events) =
        match HeadlessSession::start(&settings, location, options.resource_id, fields) {
            Ok(started) => started,
            Err(e) => {
                HeadlessEvent::error(e.to_string(), true).emit();
                return Err(e);
            }
        };
    events.iter().for_each(HeadlessEvent::emit);

    let (tx, mut rx) = mpsc::channel::<CommandLine>(64);
    let reader = match &options.events {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            spawn_command_reader(BufReader::new(file), tx)
        }
        None => spawn_command_reader(BufReader::new(tokio::io::stdin()), tx),
    };

    while let Some(line) = rx.recv().await {
        match line {
            Ok(command) => {
                trace!("Processing {:?}", command);
                session.apply(command).iter().for_each(HeadlessEvent::emit);
            }
            Err(message) => HeadlessEvent::error(message, false).emit(),
        }
    }

    if let Err(e) = reader.await {
        warn!("Command reader task failed: {}", e);
    }
    session.finish();

    info!("form-tabs headless mode exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_tabs_app::config::PanelConfig;
    use form_tabs_core::TabInfo;
    use serde_json::json;

    fn settings(name: &str) -> Settings {
        Settings {
            panel: PanelConfig::named(name),
            ..Default::default()
        }
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("type", "select-field")
                .in_tab("A", "a", 0)
                .with_value("x"),
            FieldDescriptor::new("b_field", "text-field")
                .in_tab("B", "b", 1)
                .with_tab_info(TabInfo::depends_on("type", &["x"])),
            FieldDescriptor::new("c_field", "text-field")
                .in_tab("C", "c", 2)
                .with_tab_info(TabInfo::depends_on("type", &["y"])),
        ]
    }

    fn start(fragment: Option<&str>) -> (HeadlessSession, Vec<HeadlessEvent>) {
        let location = location_for("/resources/items/1", fragment).unwrap();
        HeadlessSession::start(&settings("panel1"), location, Some("1".into()), fields()).unwrap()
    }

    fn names(events: &[HeadlessEvent]) -> Vec<&'static str> {
        events.iter().map(HeadlessEvent::name).collect()
    }

    #[test]
    fn test_location_for() {
        let loc = location_for("resources/items/1", Some("#p=a")).unwrap();
        assert_eq!(loc.path(), "/resources/items/1");
        assert_eq!(loc.fragment(), "p=a");

        let loc = location_for("/x", None).unwrap();
        assert_eq!(loc.fragment(), "");
    }

    #[test]
    fn test_start_reports_mount() {
        let (_session, events) = start(None);

        assert_eq!(
            names(&events),
            vec!["panel_mounted", "tabs_changed", "fragment_changed"]
        );
        match &events[0] {
            HeadlessEvent::PanelMounted {
                visible, active, ..
            } => {
                assert_eq!(visible, &vec!["a".to_string(), "b".to_string()]);
                assert_eq!(active.as_deref(), Some("a"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_attribute_change_reports_visibility_and_healing() {
        let (mut session, _) = start(Some("panel1=b"));

        let events = session.apply(HeadlessCommand::AttributeChanged {
            attribute: "type".into(),
            value: json!("y"),
        });

        assert_eq!(
            names(&events),
            vec!["tabs_changed", "visibility_changed", "active_tab_changed"]
        );
        assert_eq!(session.page().location().fragment(), "panel1=b");
    }

    #[test]
    fn test_click_reports_fragment() {
        let (mut session, _) = start(None);

        let events = session.apply(HeadlessCommand::TabClicked { slug: "b".into() });

        assert_eq!(
            names(&events),
            vec!["tabs_changed", "active_tab_changed", "fragment_changed"]
        );
    }

    #[test]
    fn test_unchanged_state_reports_nothing() {
        let (mut session, _) = start(None);
        let events = session.apply(HeadlessCommand::TabClicked { slug: "c".into() });
        assert!(events.is_empty());
    }

    #[test]
    fn test_theme_and_errors() {
        let (mut session, _) = start(None);

        let events = session.apply(HeadlessCommand::ThemeSwitched { theme: Theme::Dark });
        assert_eq!(names(&events), vec!["theme_changed"]);

        let errors = serde_json::from_value(json!({"b_field": ["required"]})).unwrap();
        let events = session.apply(HeadlessCommand::ValidationErrors {
            errors: Some(errors),
        });
        assert_eq!(names(&events), vec!["errors_marked"]);
        assert!(matches!(
            &events[0],
            HeadlessEvent::ErrorsMarked { tabs, .. } if tabs == &vec!["b".to_string()]
        ));
    }

    #[tokio::test]
    async fn test_command_reader_forwards_lines() {
        let input = tokio_test::io::Builder::new()
            .read(b"{\"event\":\"tab_clicked\",\"slug\":\"b\"}\n\n")
            .read(b"garbage\n{\"event\":\"navigate_start\"}\n")
            .build();
        let (tx, mut rx) = mpsc::channel(8);

        let handle = spawn_command_reader(BufReader::new(input), tx);

        assert_eq!(
            rx.recv().await,
            Some(Ok(HeadlessCommand::TabClicked { slug: "b".into() }))
        );
        assert!(matches!(rx.recv().await, Some(Err(_))));
        assert_eq!(rx.recv().await, Some(Ok(HeadlessCommand::NavigateStart)));
        assert_eq!(rx.recv().await, None);
        handle.await.unwrap();
    }
}
