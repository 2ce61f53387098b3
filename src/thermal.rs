use crate::{
	backend::Backend,
	context::{check_zero, Context},
	error::Error,
};

impl<B: Backend> Context<B> {
	/// Prepare the thermal sensor of `cpu` for reading.
	pub fn init_temp(&mut self, cpu: i32) {
		self.backend.thermal_init(cpu);
	}

	/// Read the temperature of `cpu` in degrees Celsius.
	pub fn read_temp(&mut self, cpu: i32) -> Result<u32, Error> {
		let mut value = 0;
		check_zero(self.backend.thermal_read(cpu, &mut value))?;
		Ok(value)
	}
}
