#[derive(Clone, Debug, PartialEq)]
pub struct SheetRecord {
    pub id: u64,
    pub name: String,
    /// Natural content size in CSS pixels, before the view transform.
    pub width: f64,
    pub height: f64,
    /// Inline SVG markup for the sheet body.
    pub markup: String,
}

/// Built-in demo sheets shown until a real collection is loaded.
pub fn sample_sheets() -> Vec<SheetRecord> {
    vec![
        SheetRecord {
            id: 1,
            name: "Shadow Hawk SHD-2H".into(),
            width: 1600.0,
            height: 2070.0,
            markup: r##"<svg viewBox="0 0 1600 2070" xmlns="http://www.w3.org/2000/svg">
  <rect x="8" y="8" width="1584" height="2054" fill="#fdfcf7" stroke="#222" stroke-width="4"/>
  <text x="60" y="90" font-size="52" font-family="serif">Shadow Hawk SHD-2H</text>
  <rect x="60" y="140" width="700" height="900" fill="none" stroke="#444" stroke-width="3"/>
  <text x="80" y="190" font-size="30">Armor Diagram</text>
  <g data-no-tap-zoom="true">
    <rect x="860" y="140" width="680" height="420" fill="#f3efe2" stroke="#444" stroke-width="3"/>
    <text x="880" y="190" font-size="30">Heat Scale</text>
  </g>
  <rect x="60" y="1120" width="1480" height="860" fill="none" stroke="#444" stroke-width="3"/>
  <text x="80" y="1170" font-size="30">Critical Hit Table</text>
</svg>"##
                .into(),
        },
        SheetRecord {
            id: 2,
            name: "Wolverine WVR-6R".into(),
            width: 1600.0,
            height: 2070.0,
            markup: r##"<svg viewBox="0 0 1600 2070" xmlns="http://www.w3.org/2000/svg">
  <rect x="8" y="8" width="1584" height="2054" fill="#fdfcf7" stroke="#222" stroke-width="4"/>
  <text x="60" y="90" font-size="52" font-family="serif">Wolverine WVR-6R</text>
  <rect x="60" y="140" width="700" height="900" fill="none" stroke="#444" stroke-width="3"/>
  <rect x="860" y="140" width="680" height="900" fill="none" stroke="#444" stroke-width="3"/>
  <rect x="60" y="1120" width="1480" height="860" fill="none" stroke="#444" stroke-width="3"/>
</svg>"##
                .into(),
        },
        SheetRecord {
            id: 3,
            name: "Archer ARC-2R".into(),
            width: 2070.0,
            height: 1600.0,
            markup: r##"<svg viewBox="0 0 2070 1600" xmlns="http://www.w3.org/2000/svg">
  <rect x="8" y="8" width="2054" height="1584" fill="#fdfcf7" stroke="#222" stroke-width="4"/>
  <text x="60" y="90" font-size="52" font-family="serif">Archer ARC-2R</text>
  <rect x="60" y="140" width="900" height="1380" fill="none" stroke="#444" stroke-width="3"/>
  <rect x="1040" y="140" width="970" height="1380" fill="none" stroke="#444" stroke-width="3"/>
</svg>"##
                .into(),
        },
    ]
}
