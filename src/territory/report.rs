// src/territory/report.rs

use crate::territory::area::TerritoryTotals;

/// Ganzzahlig gerundet, mit Tausendertrennzeichen: 1234567.6 -> "1,234,568".
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rangliste, eine Zeile je Besitzer: `alice: 1,234 mi²`.
pub fn leaderboard(totals: &TerritoryTotals) -> String {
    totals
        .ranked()
        .into_iter()
        .map(|(owner, area)| format!("{owner}: {} mi²", format_thousands(area)))
        .collect::<Vec<_>>()
        .join("\n")
}
