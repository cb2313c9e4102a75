//! Terminal narration of the counting ceremony.
//!
//! The casting finishes instantly; everything here is replay. Pacing is
//! pure display - the recorded change log drives what is printed, and the
//! delays imitate the rhythm of hands actually sorting stalks.

use std::io::{Write, stdout};
use std::time::Duration;

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;
use yarrow_interpreter::Interpretation;
use yarrow_types::{DivinationResult, LineRecord, LineValue};

const BANNER_WIDTH: usize = 60;
const POSITION_NAMES: [&str; 6] = ["初", "二", "三", "四", "五", "上"];

const DOT_INTERVAL: Duration = Duration::from_millis(20);
const STEP_PAUSE: Duration = Duration::from_millis(300);
const CHANGE_PAUSE: Duration = Duration::from_millis(500);
const OPENING_PAUSE: Duration = Duration::from_secs(1);
const VERDICT_PAUSE: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy)]
enum Pace {
    /// Full ceremony with typewriter output and pauses.
    Paced(Duration),
    /// Only the final hexagram summary, no delays.
    Skip,
}

/// Replays a recorded casting in the terminal.
#[derive(Debug, Clone)]
pub struct Narrator {
    pace: Pace,
}

impl Narrator {
    #[must_use]
    pub fn new(type_interval_ms: u64) -> Self {
        Self {
            pace: Pace::Paced(Duration::from_millis(type_interval_ms)),
        }
    }

    /// Narrator that skips the ceremony and prints only the summary.
    #[must_use]
    pub fn instant() -> Self {
        Self { pace: Pace::Skip }
    }

    /// Replay the whole casting, then print the hexagram summary.
    pub async fn play(&self, result: &DivinationResult, interp: &Interpretation<'_>) {
        if let Pace::Paced(_) = self.pace {
            self.opening().await;
            for record in &result.process_log {
                self.play_line(record).await;
            }
        }
        self.display_hexagram(result, interp);
    }

    async fn opening(&self) {
        println!();
        println!("{}", "=".repeat(BANNER_WIDTH));
        println!("{}", centered("大 衍 筮 法 · 全 过 程 模 拟", BANNER_WIDTH).bold());
        println!("{}", "=".repeat(BANNER_WIDTH));
        self.type_print("大衍之数五十，其用四十有九。").await;
        self.type_print("分而为二以象两，挂一以象三，").await;
        self.type_print("揲之以四以象四时，归奇于扐以象闰。").await;
        println!("{}", "=".repeat(BANNER_WIDTH));
        self.wait(OPENING_PAUSE).await;
    }

    async fn play_line(&self, record: &LineRecord) {
        let position = POSITION_NAMES[(record.line_idx - 1) as usize];
        println!();
        println!("{}", "#".repeat(BANNER_WIDTH));
        println!("{}", format!("###  正在演算：{position}爻  ###").bold());
        println!("{}", "#".repeat(BANNER_WIDTH));

        let mut current_total = yarrow_divination::STARTING_STALKS;
        for (change_idx, change) in record.changes.iter().enumerate() {
            println!("    < 第 {} 爻 - 第 {} 变 >", record.line_idx, change_idx + 1);

            println!(
                "      [分二]  左手: {}  |  右手: {}  (总: {})",
                change.left, change.right, current_total
            );
            self.wait(STEP_PAUSE).await;

            println!("      [挂一]  取右一策，挂于左手小指");

            self.count_off("左", change.left, change.left_rem).await;
            self.count_off("右", change.right - 1, change.right_rem).await;

            println!(
                "      [归奇]  挂1 + 左余{} + 右余{} = 去掉 {} 策",
                change.left_rem, change.right_rem, change.removed
            );
            println!("      [结余]  当前剩余: {} 策", change.new_total);
            println!("{}", "-".repeat(BANNER_WIDTH));
            self.wait(CHANGE_PAUSE).await;

            current_total = change.new_total;
        }

        println!(
            "  >>> {position}爻 结果判定: 剩 {current_total} 策 ÷ 4 = {}",
            record.value
        );
        println!("{}", format!("  >>> 获得: {}", verdict_text(record.value)).bold());
        self.wait(VERDICT_PAUSE).await;
    }

    /// Count a hand off by fours, one dot per group of four removed.
    async fn count_off(&self, hand: &str, count: u32, remainder: u32) {
        let mut out = stdout();
        print!("      [{hand}手] 揲四计数: ");
        let _ = out.flush();

        let mut current = count;
        while current > 4 {
            current -= 4;
            print!(".");
            let _ = out.flush();
            self.wait(DOT_INTERVAL).await;
        }
        println!(" 剩 {remainder} 策");
    }

    fn display_hexagram(&self, result: &DivinationResult, interp: &Interpretation<'_>) {
        let lines = &result.hex_result.original_lines;

        println!();
        println!();
        println!("{}", "=".repeat(BANNER_WIDTH));
        println!("{}", centered("【 本 卦 】", BANNER_WIDTH).bold());
        println!("{}", "=".repeat(BANNER_WIDTH));

        // Hexagrams draw top line first.
        for idx in (0..lines.len()).rev() {
            let value = lines[idx];
            let drawing = line_drawing(value);
            let label = format!("{}{}:", POSITION_NAMES[idx], line_ordinal(value));
            println!(
                "{} {} ({})",
                pad_display(&label, 6),
                pad_display(drawing, 9),
                value.chinese_name()
            );
        }
        println!("{}", "=".repeat(BANNER_WIDTH));

        println!("本卦: {}", interp.original.label());
        if let Some(changed) = interp.changed {
            println!("之卦: {}", changed.label());
        }
        if !interp.changing_lines.is_empty() {
            let positions = interp
                .changing_lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("、");
            println!("变爻: 第{positions}爻");
        }
        println!("断法: {}", interp.guide);
    }

    async fn type_print(&self, text: &str) {
        let Pace::Paced(interval) = self.pace else {
            println!("{text}");
            return;
        };
        if interval.is_zero() {
            println!("{text}");
            return;
        }

        let mut out = stdout();
        for ch in text.chars() {
            print!("{ch}");
            let _ = out.flush();
            tokio::time::sleep(interval).await;
        }
        println!();
    }

    async fn wait(&self, duration: Duration) {
        if let Pace::Paced(_) = self.pace {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Drawn form of a line, moving lines marked: x for old yin, o for old yang.
fn line_drawing(value: LineValue) -> &'static str {
    match value {
        LineValue::OldYin => "— — x",
        LineValue::YoungYang => "———",
        LineValue::YoungYin => "— —",
        LineValue::OldYang => "——— o",
    }
}

/// Traditional line ordinal: yang lines read 九, yin lines read 六.
fn line_ordinal(value: LineValue) -> &'static str {
    if value.is_yang() { "九" } else { "六" }
}

fn verdict_text(value: LineValue) -> &'static str {
    match value {
        LineValue::OldYin => "老阴 (六) -> 变",
        LineValue::YoungYang => "少阳 (七) -> 不变",
        LineValue::YoungYin => "少阴 (八) -> 不变",
        LineValue::OldYang => "老阳 (九) -> 变",
    }
}

fn centered(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }
    let pad = (width - text_width) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Pad with spaces to a display width, counting wide CJK cells properly.
fn pad_display(text: &str, width: usize) -> String {
    let text_width = text.width();
    let pad = width.saturating_sub(text_width);
    format!("{}{}", text, " ".repeat(pad))
}
