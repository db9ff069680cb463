//! HIR (High-level Intermediate Representation) モジュール
//!
//! ASTを意味に沿った形へ下ろす。主な内容は以下の通り。
//!
//! - モジュール・関数・スコープ・値のアリーナによる表現
//! - ビルダーによるスコープの出入りと変数の宣言・参照
//! - その場で解決できなかった名前の登録簿(解決は後の段階に任せる)

mod builder;
mod core;
mod create_hir;

pub use self::builder::{FunctionBuilder, ModuleBuilder};
pub use self::core::*;
pub use self::create_hir::BINARY_CALLEE;
