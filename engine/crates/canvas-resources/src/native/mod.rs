//! 原生对象模型
//!
//! 这里的类型代表图形 API 返回的引用计数对象：以 `Arc` 共享、不可变、身份即分配地址。
//! 它们不做任何渲染，只携带包装对象需要读取的属性。

pub mod bitmap;
pub mod brush;
pub mod command_list;
pub mod device;
pub mod geometry;
pub mod text;
