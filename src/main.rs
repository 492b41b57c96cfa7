use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use aptiq::app::{App, AppScreen, Loading};
use aptiq::config::Config;
use aptiq::event::{AppEvent, EventHandler};
use aptiq::logging;
use aptiq::remote::http::HttpQuizService;
use aptiq::ui::components::dashboard::Dashboard;
use aptiq::ui::components::loading::LoadingIndicator;
use aptiq::ui::components::question_view::QuestionView;
use aptiq::ui::layout::{AppLayout, centered_rect, fit_hints};
use aptiq::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "aptiq", version, about = "Terminal aptitude practice with coaching feedback")]
struct Cli {
    #[arg(short, long, help = "Topic to preselect")]
    topic: Option<String>,

    #[arg(long, help = "Base URL of the question/feedback service")]
    api: Option<String>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Request timeout in seconds (0 = none)")]
    timeout: Option<u64>,

    #[arg(long, help = "Print configured topics and exit")]
    list_topics: bool,

    #[arg(long, help = "Write the effective config file and exit")]
    init_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(api) = cli.api {
        config.api_base_url = api;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(topic) = cli.topic {
        if !config.topics.contains(&topic) {
            config.topics.push(topic.clone());
        }
        config.default_topic = topic;
    }

    if cli.list_topics {
        for topic in &config.topics {
            println!("{topic}");
        }
        println!("\nthemes: {}", Theme::available_themes().join(", "));
        return Ok(());
    }
    if cli.init_config {
        config.save()?;
        println!("wrote {}", Config::config_path().display());
        return Ok(());
    }

    if let Err(err) = logging::init(&config.log_level) {
        eprintln!("logging disabled: {err}");
    }

    let service = HttpQuizService::new(&config.api_base_url, config.request_timeout())?;
    let events = EventHandler::new(config.tick_rate());
    let mut app = App::new(config, Arc::new(service));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }
        app.poll();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Setup => handle_setup_key(app, key),
        AppScreen::Loading => {
            if key.code == KeyCode::Esc {
                app.cancel_loading();
            }
        }
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Report => handle_report_key(app, key),
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter | KeyCode::Char(' ') => app.start_session(),
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    let submitted = app.session.as_ref().is_some_and(|s| s.is_submitted());
    match key.code {
        KeyCode::Char(c @ '1'..='9') => {
            app.select_option(c as usize - '1' as usize);
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter if submitted => app.next_question(),
        KeyCode::Enter => app.submit(),
        KeyCode::Char('n') => app.next_question(),
        KeyCode::Char('s') => app.toggle_solution(),
        KeyCode::Char('e') | KeyCode::Esc => app.end_session(),
        _ => {}
    }
}

fn handle_report_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.restart(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, &layout);

    match app.screen {
        AppScreen::Setup => {
            let menu_area = centered_rect(50, 80, layout.main);
            frame.render_widget(&app.menu, menu_area);
        }
        AppScreen::Loading => {
            let message = match app.loading() {
                Some(Loading::FirstQuestion(_)) => "Preparing your first question...",
                _ => "Loading next question...",
            };
            let indicator = LoadingIndicator::new(message, app.spinner_frame, app.theme);
            frame.render_widget(indicator, centered_rect(50, 30, layout.main));
        }
        AppScreen::Practice => {
            if let Some(session) = app.session.as_ref() {
                frame.render_widget(QuestionView::new(session, app.theme), layout.main);
            }
        }
        AppScreen::Report => {
            let dashboard = Dashboard::new(
                app.report.as_ref(),
                &app.feedback,
                app.notice.as_deref(),
                app.theme,
            );
            frame.render_widget(dashboard, layout.main);
        }
    }

    let hints: &[&str] = match app.screen {
        AppScreen::Setup => &["[\u{2191}\u{2193}] Topic", "[Enter] Start", "[q] Quit"],
        AppScreen::Loading => &["[Esc] Cancel"],
        AppScreen::Practice => {
            if app.session.as_ref().is_some_and(|s| s.is_submitted()) {
                &["[Enter/n] Next", "[s] Solution", "[e] End session"]
            } else {
                &["[1-9/\u{2191}\u{2193}] Choose", "[Enter] Submit", "[e] End session"]
            }
        }
        AppScreen::Report => &["[r] Practice again", "[q] Quit"],
    };
    let footer_text = fit_hints(hints, layout.footer.width as usize);
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let mut spans = vec![Span::styled(
        " aptiq ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )];

    let info = match (app.screen, app.session.as_ref()) {
        (AppScreen::Practice, Some(session)) => format!(
            " Question: {} | Topic: {} | Time: {}s",
            session.question_number(),
            session.topic(),
            session.elapsed_secs()
        ),
        (AppScreen::Setup, _) => format!(" Topic: {}", app.selected_topic()),
        (_, Some(session)) => format!(" Topic: {}", session.topic()),
        _ => String::new(),
    };
    spans.push(Span::styled(
        info,
        Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
    ));

    if let (Some(notice), AppScreen::Setup | AppScreen::Practice) = (app.notice.as_deref(), app.screen) {
        spans.push(Span::styled(
            format!("  {notice}"),
            Style::default().fg(colors.warning()).bg(colors.header_bg()),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);
}
