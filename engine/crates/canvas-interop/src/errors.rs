use thiserror::Error;

/// 缓存操作返回给调用方的错误
///
/// 违反注册协议（重复添加、注销不存在的条目）不在这里：那是协作方的缺陷，直接 panic。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteropError {
    /// 没有任何探针能识别这个原生类型
    #[error("no wrapper constructor is registered for native type `{type_name}`")]
    UnknownResourceType { type_name: &'static str },

    /// 已有的包装对象绑定在另一个设备上
    #[error("the existing wrapper is bound to a different device")]
    DeviceMismatch,

    /// 已有的包装对象 DPI 与请求不一致
    #[error("the existing wrapper has dpi {actual}, but dpi {expected} was requested")]
    DpiMismatch { expected: f32, actual: f32 },

    /// 包装对象已经关闭
    #[error("the wrapper has been closed")]
    Closed,

    /// 缓存里的包装对象不是调用方要求的类型
    #[error("the wrapper is a `{actual}`, not a `{expected}`")]
    WrongWrapperType {
        expected: &'static str,
        actual: &'static str,
    },

    /// 构造函数拒绝了这个原生资源
    #[error("wrapper construction failed: {0}")]
    Construction(String),
}

pub type InteropResult<T> = Result<T, InteropError>;
