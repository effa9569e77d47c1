use crate::error::FilterError;

/// Largest kernel size whose binomial row and sum fit the `u32` recurrence.
pub const MAX_KERNEL_SIZE: usize = 31;

/// Compute the `n`-th row of Pascal's triangle.
///
/// The first half is built with the multiplicative recurrence
/// `row[i] = row[i - 1] * (n - i + 1) / i` and mirrored into the second half.
///
/// PRECONDITION: `n + 1 <= MAX_KERNEL_SIZE`, otherwise the intermediate products overflow.
///
/// # Arguments
///
/// * `n` - The row index, the result has `n + 1` elements.
///
/// # Returns
///
/// A vector with the binomial coefficients `C(n, 0) .. C(n, n)`.
pub fn pascal_row(n: usize) -> Vec<u32> {
    let mut row = vec![0u32; n + 1];
    row[0] = 1;

    let n32 = n as u32;
    for i in 1..n / 2 + 1 {
        row[i] = row[i - 1] * (n32 - i as u32 + 1) / i as u32;
    }

    // mirror the first half
    for i in n / 2 + 1..=n {
        row[i] = row[n - i];
    }

    row
}

/// A normalized binomial approximation of a Gaussian kernel.
///
/// The weights are the `(size - 1)`-th row of Pascal's triangle and sum to `2^(size - 1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinomialKernel {
    weights: Vec<u32>,
    sum: u64,
}

impl BinomialKernel {
    /// Create a binomial kernel of the given size.
    ///
    /// # Arguments
    ///
    /// * `kernel_size` - The odd size of the kernel.
    ///
    /// # Errors
    ///
    /// Even sizes, zero and sizes above [`MAX_KERNEL_SIZE`] are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use gauss_imgproc::filter::kernels::BinomialKernel;
    ///
    /// let kernel = BinomialKernel::new(5).unwrap();
    /// assert_eq!(kernel.weights(), &[1, 4, 6, 4, 1]);
    /// assert_eq!(kernel.sum(), 16);
    /// ```
    pub fn new(kernel_size: usize) -> Result<Self, FilterError> {
        validate_kernel_size(kernel_size)?;

        let weights = pascal_row(kernel_size - 1);
        let sum = weights.iter().map(|&w| w as u64).sum();

        Ok(Self { weights, sum })
    }

    /// The number of weights.
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    /// The number of weights on each side of the center.
    pub fn half(&self) -> usize {
        self.weights.len() / 2
    }

    /// The kernel weights.
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// The sum of the weights, used to normalize the accumulated channels.
    pub fn sum(&self) -> u64 {
        self.sum
    }
}

/// Check that a kernel size is odd, non-zero and within [`MAX_KERNEL_SIZE`].
pub fn validate_kernel_size(kernel_size: usize) -> Result<(), FilterError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(FilterError::InvalidKernelSize(kernel_size));
    }
    if kernel_size > MAX_KERNEL_SIZE {
        return Err(FilterError::KernelSizeTooLarge(
            kernel_size,
            MAX_KERNEL_SIZE,
        ));
    }
    Ok(())
}
