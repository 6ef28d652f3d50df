// Message catalog. Every user-facing string goes through here.

use std::fmt;
use std::str::FromStr;

use crate::InstanceState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    EnUs,
    JaJp,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::JaJp => "ja-JP",
        }
    }

    /// Matches a single language tag on its primary subtag ("ja", "ja-JP", "EN-gb").
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::EnUs),
            "ja" => Some(Locale::JaJp),
            _ => None,
        }
    }

    /// First supported language in an `Accept-Language` value, by descending q-weight.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut ranked: Vec<(f32, Locale)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let locale = Locale::from_tag(pieces.next()?)?;
                let q = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((q, locale))
            })
            .filter(|(q, _)| *q > 0.0)
            .collect();
        // stable: equal weights keep header order
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        ranked.first().map(|(_, l)| *l)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(s).ok_or_else(|| format!("unsupported locale '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // relay
    InstancesStarting,
    InstancesStopping,
    InvalidParameters,
    UnknownAction(String),
    MissingInstanceId,
    ControlFailed,
    // directory
    InstanceNotFound,
    ListFailed,
    DetailFailed,
    // dashboard
    SelectInstances,
    ActionInFlight,
    ActionFailed,
    ListLoadError,
    DetailLoadError,
    NoInstances,
    NoName,
    StateLabel(InstanceState),
}

impl Message {
    pub fn text(&self, locale: Locale) -> String {
        match locale {
            Locale::EnUs => self.en(),
            Locale::JaJp => self.ja(),
        }
    }

    fn en(&self) -> String {
        match self {
            Message::InstancesStarting => "Instances are starting".into(),
            Message::InstancesStopping => "Instances are stopping".into(),
            Message::InvalidParameters => "Invalid request parameters".into(),
            Message::UnknownAction(a) => format!("Unknown action: {}", a),
            Message::MissingInstanceId => "No instance ID was specified".into(),
            Message::ControlFailed => "Failed to operate the EC2 instances".into(),
            Message::InstanceNotFound => "The specified instance was not found".into(),
            Message::ListFailed => "Failed to retrieve the EC2 instance list".into(),
            Message::DetailFailed => "Failed to retrieve the EC2 instance details".into(),
            Message::SelectInstances => "Select the instances to operate on".into(),
            Message::ActionInFlight => "Another operation is still in progress".into(),
            Message::ActionFailed => "Instance operation failed".into(),
            Message::ListLoadError => "An error occurred while fetching the instance list".into(),
            Message::DetailLoadError => {
                "An error occurred while fetching the instance details".into()
            }
            Message::NoInstances => "No instances".into(),
            Message::NoName => "No Name".into(),
            Message::StateLabel(state) => match state {
                InstanceState::Running => "Running".into(),
                InstanceState::Stopped => "Stopped".into(),
                InstanceState::Pending => "Starting".into(),
                InstanceState::Stopping => "Stopping".into(),
                other => other.as_str().to_string(),
            },
        }
    }

    fn ja(&self) -> String {
        match self {
            Message::InstancesStarting => "インスタンスを起動しました".into(),
            Message::InstancesStopping => "インスタンスを停止しました".into(),
            Message::InvalidParameters => "無効なリクエストパラメータです".into(),
            Message::UnknownAction(a) => format!("不明なアクション: {}", a),
            Message::MissingInstanceId => "インスタンスIDが指定されていません".into(),
            Message::ControlFailed => "EC2インスタンスの操作に失敗しました".into(),
            Message::InstanceNotFound => "指定されたインスタンスが見つかりません".into(),
            Message::ListFailed => "EC2インスタンス一覧の取得に失敗しました".into(),
            Message::DetailFailed => "EC2インスタンス詳細の取得に失敗しました".into(),
            Message::SelectInstances => "操作するインスタンスを選択してください".into(),
            Message::ActionInFlight => "別の操作を処理中です".into(),
            Message::ActionFailed => "インスタンス操作に失敗しました".into(),
            Message::ListLoadError => "インスタンス一覧の取得中にエラーが発生しました".into(),
            Message::DetailLoadError => "インスタンス詳細の取得中にエラーが発生しました".into(),
            Message::NoInstances => "インスタンスがありません".into(),
            Message::NoName => "名前なし".into(),
            Message::StateLabel(state) => match state {
                InstanceState::Running => "実行中".into(),
                InstanceState::Stopped => "停止".into(),
                InstanceState::Pending => "起動中".into(),
                InstanceState::Stopping => "停止中".into(),
                other => other.as_str().to_string(),
            },
        }
    }
}
