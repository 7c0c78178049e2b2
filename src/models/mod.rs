mod bonus;
mod chart;
mod comment;
mod insight;
mod kpi;
mod series;
mod waterfall;

pub use bonus::{ApprovalStatus, BonusRecord};
pub use chart::{AiAnalysis, AnalyzeResponse, ChartKind, ChartSeries, UnknownChartKind, UploadKpis};
pub use comment::{Comment, CommentList, CreateComment, DeleteComment};
pub use insight::{Insight, InsightFact, InsightReport};
pub use kpi::KpiSummary;
pub use series::{
    coerce_number, scrub_number, LabeledSeries, RawSalesPayload, RawSeries, SalesPayload,
};
pub use waterfall::{StepDirection, WaterfallPoint};
