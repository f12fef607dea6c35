use ratatui::layout::Rect;

/// Split the screen into header (tabs), body and footer (hints).
pub fn layout_regions(area: Rect) -> (Rect, Rect, Rect) {
    let header_height = area.height.min(3);
    let footer_height = 3.min(area.height.saturating_sub(header_height));
    let header = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: header_height,
    };
    let footer = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(footer_height),
        width: area.width,
        height: footer_height,
    };
    let body = Rect {
        x: area.x,
        y: area.y + header_height,
        width: area.width,
        height: area.height.saturating_sub(header_height + footer_height),
    };
    (header, body, footer)
}

/// Split the workflows body into a list on the left and the selected
/// workflow's output on the right.
pub fn split_master_detail(body: Rect) -> (Rect, Rect) {
    let list_width = (body.width / 3).clamp(body.width.min(24), body.width);
    let list = Rect {
        width: list_width,
        ..body
    };
    let detail = Rect {
        x: body.x + list_width,
        width: body.width.saturating_sub(list_width),
        ..body
    };
    (list, detail)
}
