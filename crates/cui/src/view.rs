use crate::app::{App, CELL_HEIGHT, CELL_WIDTH};
use gacha_core::{CardView, Celebration, ParticleFrame, Rarity};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    draw_card(frame, root[1], app);
    draw_events(frame, root[2], app);

    let full = frame.area();
    for celebration in &app.celebrations {
        draw_celebration(frame, full, celebration);
    }

    if let Some(notice) = app.notice.as_deref() {
        draw_notice(frame, app, notice);
    }
    if app.show_help {
        draw_help_popup(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let lines = vec![
        Line::from(app.locale.text("Scholar Gacha", "学者ガチャ").bold()),
        Line::from(format!(
            "{}: {}  |  {}: {}/{}  |  {}: {}",
            app.locale.text("Filter", "フィルター"),
            app.filter_label(),
            app.locale.text("Drawn", "排出済み"),
            session.history().len(),
            session.eligible_count(),
            app.locale.text("Pool", "総数"),
            session.dataset().len()
        )),
        Line::from(format!(
            "{} {} | {} {}",
            app.locale.text("Seed", "シード"),
            app.seed,
            app.locale.text("Lang", "言語"),
            app.locale.code()
        )),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Status", "状態"),
            app.status_line
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Overview", "概要"));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_card(frame: &mut Frame, area: Rect, app: &App) {
    let Some(pull) = app.current.as_ref() else {
        let hint = app.locale.text(
            "Press space to draw a scholar. f changes the category.",
            "スペースでガチャを引く。f でカテゴリ切替。",
        );
        let block = Block::default().borders(Borders::ALL);
        frame.render_widget(
            Paragraph::new(hint).alignment(Alignment::Center).block(block),
            area,
        );
        return;
    };

    let entrance = app.entrance.frame(app.entrance_elapsed_ms);
    let shift = ((entrance.offset / CELL_HEIGHT).round() as u16).min(area.height.saturating_sub(1));
    let area = Rect {
        y: area.y + shift,
        height: area.height - shift,
        ..area
    };
    let card = &pull.card;
    let accent = rarity_color(card.rarity);
    let mut base = Style::default();
    if entrance.opacity < 0.5 {
        base = base.add_modifier(Modifier::DIM);
    }
    if card.background.is_some() {
        base = base.bg(background_color(card.rarity));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Line::from(format!(" {} ", card.rarity)).fg(accent).bold())
        .style(base);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(card_lines(app, card))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn card_lines<'a>(app: &App, card: &'a CardView) -> Vec<Line<'a>> {
    let heading = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let avatar = if card.avatar_is_placeholder {
        app.locale.text("(no image)", "（画像なし）").to_string()
    } else {
        card.avatar.clone()
    };
    vec![
        Line::from(card.name_ja.as_str().bold()),
        Line::from(card.name_en.as_str()),
        Line::from(card.affiliation.as_str().italic()),
        Line::from(Span::styled(avatar, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::styled(app.locale.text("Contribution", "貢献").to_string(), heading),
        Line::from(card.contribution.as_str()),
        Line::from(""),
        Line::styled(app.locale.text("Trivia", "豆知識").to_string(), heading),
        Line::from(card.trivia.as_str()),
    ]
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .event_log
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Events", "ログ"));
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_celebration(frame: &mut Frame, area: Rect, celebration: &Celebration) {
    let snapshot = celebration.frame();
    let (r, g, b) = celebration.plan().timing.accent;
    if snapshot.overlay_opacity > 0.0 {
        tint_radial(frame, area, (r, g, b), snapshot.overlay_opacity);
    }
    for particle in &snapshot.particles {
        draw_particle(frame, area, particle, Color::Rgb(r, g, b));
    }
    if snapshot.banner_scale <= 0.05 {
        return;
    }
    let text = celebration.plan().timing.banner_text.as_str();
    let full_width = text.chars().count() as f64 + 8.0;
    let width = ((full_width * snapshot.banner_scale).round() as u16)
        .clamp(3, area.width.max(3));
    let height = 3.min(area.height);
    let banner = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height,
    };
    frame.render_widget(Clear, banner);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(r, g, b)));
    frame.render_widget(
        Paragraph::new(Line::from(text).bold().fg(Color::Rgb(r, g, b)))
            .alignment(Alignment::Center)
            .block(block),
        banner,
    );
}

/// Radial glow: strongest at the center, fading out at 70% of the half-diagonal.
fn tint_radial(frame: &mut Frame, area: Rect, accent: (u8, u8, u8), opacity: f64) {
    let cx = area.x as f64 + area.width as f64 / 2.0;
    let cy = area.y as f64 + area.height as f64 / 2.0;
    let radius = ((area.width as f64 / 2.0).powi(2) + (area.height as f64).powi(2)).sqrt();
    let buffer = frame.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let dx = x as f64 - cx;
            // Cells are about twice as tall as wide.
            let dy = (y as f64 - cy) * 2.0;
            let dist = (dx * dx + dy * dy).sqrt() / radius;
            let strength = opacity * 0.8 * (1.0 - dist / 0.7).max(0.0);
            if strength <= 0.0 {
                continue;
            }
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_bg(Color::Rgb(
                    (accent.0 as f64 * strength) as u8,
                    (accent.1 as f64 * strength) as u8,
                    (accent.2 as f64 * strength) as u8,
                ));
            }
        }
    }
}

fn draw_particle(frame: &mut Frame, area: Rect, particle: &ParticleFrame, color: Color) {
    let col = (particle.x / CELL_WIDTH).floor();
    let row = (particle.y / CELL_HEIGHT).floor();
    if col < 0.0 || row < 0.0 || col >= area.width as f64 || row >= area.height as f64 {
        return;
    }
    let symbol = if particle.scale > 0.66 && particle.size > 12.0 {
        "✦"
    } else if particle.scale > 0.33 {
        "*"
    } else {
        "·"
    };
    if let Some(cell) = frame
        .buffer_mut()
        .cell_mut((area.x + col as u16, area.y + row as u16))
    {
        cell.set_symbol(symbol).set_fg(color);
    }
}

fn draw_notice(frame: &mut Frame, app: &App, notice: &str) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(app.locale.text("Notice", "お知らせ"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let lines = vec![
        Line::from(notice),
        Line::from(""),
        Line::from(app.locale.text("press any key", "何かキーを押してください").dark_gray()),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text(
            "space/enter/g draw one scholar",
            "スペース/エンター/g 1回引く",
        )),
        Line::from(app.locale.text(
            "f/tab next category | F/shift+tab previous",
            "f/tab 次のカテゴリ | F/shift+tab 前のカテゴリ",
        )),
        Line::from(app.locale.text("r reset draw history", "r 排出履歴をリセット")),
        Line::from(app.locale.text("? help | q quit", "? ヘルプ | q 終了")),
    ];
    let block = Block::default()
        .title(app.locale.text("Help", "ヘルプ"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn rarity_color(rarity: Rarity) -> Color {
    match rarity {
        Rarity::N => Color::Gray,
        Rarity::R => Color::LightBlue,
        Rarity::SR => Color::Rgb(192, 192, 192),
        Rarity::SSR => Color::Rgb(255, 215, 0),
    }
}

fn background_color(rarity: Rarity) -> Color {
    match rarity {
        Rarity::SSR => Color::Rgb(48, 40, 0),
        Rarity::SR => Color::Rgb(36, 36, 40),
        Rarity::N | Rarity::R => Color::Reset,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
