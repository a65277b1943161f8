pub trait BaseOperations {
    type BaseError;

    fn set_to(&mut self, size: usize, val: f32) -> Result<(), Self::BaseError>;

    /// Copies (or adds, if `add`) a strided `rows x cols` block of `a` into `self`.
    ///
    /// Both buffers are column-major: column `c` starts at `offset + stride * c`
    /// and holds `rows` contiguous values.
    #[allow(clippy::too_many_arguments)]
    fn copy_or_add_strided(
        &mut self,
        add: bool,
        rows: usize,
        cols: usize,
        offset: usize,
        stride: usize,
        a: &Self,
        offset_a: usize,
        stride_a: usize,
    ) -> Result<(), Self::BaseError>;
}
